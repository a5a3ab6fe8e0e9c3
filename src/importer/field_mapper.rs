// ==========================================
// 急诊就诊统计引擎 - 分类字段映射器
// ==========================================
// 职责: 自由文本 → 分类枚举（转诊/性别/年龄段）、诊断编码与片区标签标准化
// 说明: 无法识别的值映射为枚举的未知项，由调用方记录 DQ 告警
// ==========================================

use crate::domain::types::{AgeBand, Referral, Sex};

pub struct FieldMapper;

impl FieldMapper {
    /// 转诊来源
    ///
    /// 返回 (枚举值, 是否识别)。
    pub fn map_referral(&self, value: Option<&str>) -> (Referral, bool) {
        let Some(raw) = value else {
            return (Referral::Unknown, true);
        };
        let v = raw.trim().to_lowercase();
        let mapped = match v.as_str() {
            "with_referral" | "with referral" | "with" | "referred" | "yes" | "y" | "1"
            | "true" | "su siuntimu" | "有转诊" => Some(Referral::WithReferral),
            "without_referral" | "without referral" | "without" | "self" | "no" | "n" | "0"
            | "false" | "be siuntimo" | "无转诊" => Some(Referral::WithoutReferral),
            "unknown" | "" => Some(Referral::Unknown),
            _ => None,
        };
        match mapped {
            Some(r) => (r, true),
            None => (Referral::Unknown, false),
        }
    }

    /// 性别
    pub fn map_sex(&self, value: Option<&str>) -> (Sex, bool) {
        let Some(raw) = value else {
            return (Sex::Other, true);
        };
        match raw.trim().to_lowercase().as_str() {
            "m" | "male" | "man" | "v" | "vyras" | "男" => (Sex::Male, true),
            "f" | "female" | "woman" | "moteris" | "女" => (Sex::Female, true),
            "other" | "unspecified" | "x" | "" => (Sex::Other, true),
            _ => (Sex::Other, false),
        }
    }

    /// 年龄段：接受周岁数字或年龄段标签
    pub fn map_age_band(&self, value: Option<&str>) -> (AgeBand, bool) {
        let Some(raw) = value else {
            return (AgeBand::Unknown, true);
        };
        let v = raw.trim();
        if let Ok(age) = v.parse::<u32>() {
            if age <= 130 {
                return (AgeBand::from_age(age), true);
            }
            return (AgeBand::Unknown, false);
        }
        // 小数年龄（如 0.5 岁婴儿）
        if let Ok(age) = v.parse::<f64>() {
            if (0.0..=130.0).contains(&age) {
                return (AgeBand::from_age(age.floor() as u32), true);
            }
            return (AgeBand::Unknown, false);
        }
        let compact: String = v.chars().filter(|c| !c.is_whitespace()).collect();
        match AgeBand::ALL.iter().find(|b| b.code() == compact) {
            Some(band) => (*band, true),
            None => (AgeBand::Unknown, false),
        }
    }

    /// 诊断编码：去空白、大写
    pub fn normalize_diagnosis_code(&self, value: Option<&str>) -> Option<String> {
        let code: String = value?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        (!code.is_empty()).then_some(code)
    }

    /// 片区标签：合并连续空白
    pub fn normalize_area_label(&self, value: Option<&str>) -> Option<String> {
        let label = value?.split_whitespace().collect::<Vec<_>>().join(" ");
        (!label.is_empty()).then_some(label)
    }
}
