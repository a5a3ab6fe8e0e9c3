// ==========================================
// 急诊就诊统计引擎 - 标签排序规则
// ==========================================
// 职责: 按语言比较标签（并列排序的确定性依据）
// 规则: 不区分大小写；变音符号先折叠为基字母比较，再作次级比较
// 规则: lt 语言下 ą č ę ė į š ų ū ž 为独立字母，排在基字母之后
// ==========================================

use std::cmp::Ordering;

/// 标签比较器
#[derive(Debug, Clone)]
pub struct LabelCollator {
    lithuanian: bool,
}

/// 单个字符的排序键: (基字母, 字母表内序号, 次级权重)
type CharKey = (char, u8, u8);

impl LabelCollator {
    pub fn new(locale: &str) -> Self {
        let lang = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        Self {
            lithuanian: lang == "lt",
        }
    }

    /// 比较两个标签
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let ka = self.sort_key(a);
        let kb = self.sort_key(b);

        let primary = ka
            .iter()
            .map(|k| (k.0, k.1))
            .cmp(kb.iter().map(|k| (k.0, k.1)));
        primary
            .then_with(|| ka.iter().map(|k| k.2).cmp(kb.iter().map(|k| k.2)))
            .then_with(|| a.cmp(b))
    }

    fn sort_key(&self, label: &str) -> Vec<CharKey> {
        label
            .trim()
            .chars()
            .flat_map(|c| c.to_lowercase())
            .map(|c| self.char_key(c))
            .collect()
    }

    fn char_key(&self, c: char) -> CharKey {
        if self.lithuanian {
            match c {
                'ą' => return ('a', 1, 0),
                'č' => return ('c', 1, 0),
                'ę' => return ('e', 1, 0),
                'ė' => return ('e', 2, 0),
                'į' => return ('i', 1, 0),
                'y' => return ('i', 2, 0),
                'š' => return ('s', 1, 0),
                'ų' => return ('u', 1, 0),
                'ū' => return ('u', 2, 0),
                'ž' => return ('z', 1, 0),
                _ => {}
            }
        }
        match fold_diacritic(c) {
            Some(base) => (base, 0, 1),
            None => (c, 0, 0),
        }
    }
}

/// 常见拉丁变音字母 → 基字母
fn fold_diacritic(c: char) -> Option<char> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' | 'ă' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ģ' | 'ğ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => 'i',
        'ķ' => 'k',
        'ļ' | 'ł' | 'ľ' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ŕ' | 'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' | 'ţ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ų' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => return None,
    };
    Some(base)
}
