// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库，目录位于 locales/
// 语言: es（默认/回退）、en、zh-CN
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "es";

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 3] = ["es", "en", "zh-CN"];

/// 目录中的全部消息键（ApiError 与命令行使用）
pub const CATALOG_KEYS: [&str; 11] = [
    "import.unsupported_extension",
    "import.read_failed",
    "import.parse_failed",
    "import.stale_result",
    "mapping.invalid",
    "mapping.unknown_header",
    "session.invalid_state",
    "export.download_ok",
    "submission.missing_token",
    "submission.success",
    "submission.failed",
];

/// 把用户输入的语言代码归一化为受支持的语言
///
/// 大小写不敏感；"en-US"、"es_VE" 之类的地区变体按主语言匹配；
/// 无法识别时回退到 [`DEFAULT_LOCALE`]。
pub fn resolve_locale(requested: &str) -> &'static str {
    let wanted = requested.trim().replace('_', "-").to_lowercase();

    if let Some(exact) = SUPPORTED_LOCALES
        .iter()
        .find(|locale| locale.to_lowercase() == wanted)
    {
        return *exact;
    }

    let primary = wanted.split('-').next().unwrap_or("");
    SUPPORTED_LOCALES
        .iter()
        .find(|locale| locale.split('-').next() == Some(primary))
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
}

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言（经 [`resolve_locale`] 归一化）
///
/// # 返回
/// 实际生效的语言代码
pub fn set_locale(locale: &str) -> &'static str {
    let resolved = resolve_locale(locale);
    if resolved != locale {
        tracing::debug!(requested = locale, resolved, "语言代码已归一化");
    }
    rust_i18n::set_locale(resolved);
    resolved
}

/// 翻译消息（无参数）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息，替换 `%{name}` 占位符
///
/// # 示例
/// ```no_run
/// use roster_import::i18n::t_with_args;
/// let msg = t_with_args("mapping.unknown_header", &[("header", "DNI")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |message, (name, value)| {
        message.replace(&format!("%{{{}}}", name), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // locale 为全局状态，i18n 相关测试串行化
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_resolve_locale() {
        assert_eq!(resolve_locale("en"), "en");
        assert_eq!(resolve_locale("EN-us"), "en");
        assert_eq!(resolve_locale("es_VE"), "es");
        assert_eq!(resolve_locale("zh-cn"), "zh-CN");
        assert_eq!(resolve_locale("zh_TW"), "zh-CN");
        assert_eq!(resolve_locale("fr"), DEFAULT_LOCALE);
        assert_eq!(resolve_locale(""), DEFAULT_LOCALE);
    }

    #[test]
    fn test_set_locale_normalizes() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        assert_eq!(set_locale("en_GB"), "en");
        assert_eq!(current_locale(), "en");

        assert_eq!(set_locale("pt"), "es");
        assert_eq!(current_locale(), "es");
    }

    #[test]
    fn test_catalog_complete_in_every_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        for locale in SUPPORTED_LOCALES {
            set_locale(locale);
            for key in CATALOG_KEYS {
                let message = t(key);
                assert!(
                    !message.is_empty() && !message.contains(key),
                    "{} 缺少消息 {}",
                    locale,
                    key
                );
            }
        }
        set_locale(DEFAULT_LOCALE);
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("es");
        let msg = t_with_args("mapping.unknown_header", &[("header", "DNI")]);
        assert_eq!(msg, "La columna DNI no existe en el archivo");

        set_locale("zh-CN");
        let msg = t_with_args("session.invalid_state", &[("step", "map")]);
        assert!(msg.ends_with("map"));

        set_locale(DEFAULT_LOCALE);
    }
}
