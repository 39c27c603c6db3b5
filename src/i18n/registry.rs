//! Language registry: the closed catalog of languages the engine can target.
//!
//! The catalog is built once on first access behind a `OnceLock` and stays
//! immutable afterwards. Lookups are case-insensitive so that codes typed by
//! a user (`FR`, `zh-cn`) resolve to the catalog spelling (`fr`, `zh-CN`).

use std::sync::OnceLock;

/// Metadata for one supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Provider language code (e.g., "en", "zh-CN")
    pub code: &'static str,

    /// English name of the language (e.g., "French")
    pub name: &'static str,

    /// Native name of the language (e.g., "Français")
    pub native_name: &'static str,
}

/// Global language catalog.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Look up a language by code, ignoring ASCII case.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages
            .iter()
            .find(|lang| lang.code.eq_ignore_ascii_case(code))
    }

    /// All catalog entries, in catalog order.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Whether `code` names a catalog language (case-insensitive).
    pub fn contains(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// English display name for a code, if it is in the catalog.
    pub fn display_name(&self, code: &str) -> Option<&'static str> {
        self.get_by_code(code).map(|lang| lang.name)
    }
}

macro_rules! lang {
    ($code:expr, $name:expr, $native:expr) => {
        LanguageConfig {
            code: $code,
            name: $name,
            native_name: $native,
        }
    };
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        lang!("af", "Afrikaans", "Afrikaans"),
        lang!("sq", "Albanian", "Shqip"),
        lang!("am", "Amharic", "አማርኛ"),
        lang!("ar", "Arabic", "العربية"),
        lang!("hy", "Armenian", "Հայերեն"),
        lang!("az", "Azerbaijani", "Azərbaycan"),
        lang!("eu", "Basque", "Euskara"),
        lang!("be", "Belarusian", "Беларуская"),
        lang!("bn", "Bengali", "বাংলা"),
        lang!("bs", "Bosnian", "Bosanski"),
        lang!("bg", "Bulgarian", "Български"),
        lang!("ca", "Catalan", "Català"),
        lang!("zh-CN", "Chinese (Simplified)", "简体中文"),
        lang!("zh-TW", "Chinese (Traditional)", "繁體中文"),
        lang!("hr", "Croatian", "Hrvatski"),
        lang!("cs", "Czech", "Čeština"),
        lang!("da", "Danish", "Dansk"),
        lang!("nl", "Dutch", "Nederlands"),
        lang!("en", "English", "English"),
        lang!("eo", "Esperanto", "Esperanto"),
        lang!("et", "Estonian", "Eesti"),
        lang!("fi", "Finnish", "Suomi"),
        lang!("fr", "French", "Français"),
        lang!("gl", "Galician", "Galego"),
        lang!("ka", "Georgian", "ქართული"),
        lang!("de", "German", "Deutsch"),
        lang!("el", "Greek", "Ελληνικά"),
        lang!("gu", "Gujarati", "ગુજરાતી"),
        lang!("ht", "Haitian Creole", "Kreyòl ayisyen"),
        lang!("iw", "Hebrew", "עברית"),
        lang!("hi", "Hindi", "हिन्दी"),
        lang!("hu", "Hungarian", "Magyar"),
        lang!("is", "Icelandic", "Íslenska"),
        lang!("id", "Indonesian", "Bahasa Indonesia"),
        lang!("ga", "Irish", "Gaeilge"),
        lang!("it", "Italian", "Italiano"),
        lang!("ja", "Japanese", "日本語"),
        lang!("kn", "Kannada", "ಕನ್ನಡ"),
        lang!("kk", "Kazakh", "Қазақ"),
        lang!("ko", "Korean", "한국어"),
        lang!("la", "Latin", "Latina"),
        lang!("lv", "Latvian", "Latviešu"),
        lang!("lt", "Lithuanian", "Lietuvių"),
        lang!("mk", "Macedonian", "Македонски"),
        lang!("ms", "Malay", "Bahasa Melayu"),
        lang!("ml", "Malayalam", "മലയാളം"),
        lang!("mr", "Marathi", "मराठी"),
        lang!("mn", "Mongolian", "Монгол"),
        lang!("ne", "Nepali", "नेपाली"),
        lang!("no", "Norwegian", "Norsk"),
        lang!("fa", "Persian", "فارسی"),
        lang!("pl", "Polish", "Polski"),
        lang!("pt", "Portuguese", "Português"),
        lang!("pa", "Punjabi", "ਪੰਜਾਬੀ"),
        lang!("ro", "Romanian", "Română"),
        lang!("ru", "Russian", "Русский"),
        lang!("sr", "Serbian", "Српски"),
        lang!("sk", "Slovak", "Slovenčina"),
        lang!("sl", "Slovenian", "Slovenščina"),
        lang!("es", "Spanish", "Español"),
        lang!("sw", "Swahili", "Kiswahili"),
        lang!("sv", "Swedish", "Svenska"),
        lang!("tl", "Tagalog", "Tagalog"),
        lang!("ta", "Tamil", "தமிழ்"),
        lang!("te", "Telugu", "తెలుగు"),
        lang!("th", "Thai", "ไทย"),
        lang!("tr", "Turkish", "Türkçe"),
        lang!("uk", "Ukrainian", "Українська"),
        lang!("ur", "Urdu", "اردو"),
        lang!("uz", "Uzbek", "Oʻzbek"),
        lang!("vi", "Vietnamese", "Tiếng Việt"),
        lang!("cy", "Welsh", "Cymraeg"),
        lang!("yi", "Yiddish", "ייִדיש"),
        lang!("zu", "Zulu", "isiZulu"),
    ]
}
