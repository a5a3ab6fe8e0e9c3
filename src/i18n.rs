// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 注意: 报表标签一律显式传入语言，不读写全局 locale
// ==========================================

/// 翻译消息（显式语言）
///
/// # 示例
/// ```no_run
/// use ed_visit_analytics::i18n::t;
/// let label = t("report.other", "zh-CN");
/// ```
pub fn t(key: &str, locale: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 可用语言列表
pub fn available_locales() -> Vec<String> {
    rust_i18n::available_locales!()
        .into_iter()
        .map(|l| l.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_explicit_locale() {
        assert_eq!(t("report.other", "en"), "Other");
        assert_eq!(t("report.other", "zh-CN"), "其他");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        assert_eq!(t("sex.male", "lt"), "Male");
    }

    #[test]
    fn test_available_locales() {
        let locales = available_locales();
        assert!(locales.iter().any(|l| l == "en"));
        assert!(locales.iter().any(|l| l == "zh-CN"));
    }
}
