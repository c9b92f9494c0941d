use std::fmt;

/// Locales backed by the fake data catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocaleKey {
    EnUs,
    FrFr,
    PtBr,
    JaJp,
    ZhCn,
    ZhTw,
    ArSa,
}

impl LocaleKey {
    pub const SUPPORTED: &'static [LocaleKey] = &[
        LocaleKey::EnUs,
        LocaleKey::FrFr,
        LocaleKey::PtBr,
        LocaleKey::JaJp,
        LocaleKey::ZhCn,
        LocaleKey::ZhTw,
        LocaleKey::ArSa,
    ];

    /// Parse a locale tag. Case and `-`/`_` separators are not significant,
    /// and a bare `en` maps to `en_US`.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().replace('-', "_").to_ascii_lowercase();
        match normalized.as_str() {
            "en" | "en_us" => Some(Self::EnUs),
            "fr_fr" => Some(Self::FrFr),
            "pt_br" => Some(Self::PtBr),
            "ja_jp" => Some(Self::JaJp),
            "zh_cn" => Some(Self::ZhCn),
            "zh_tw" => Some(Self::ZhTw),
            "ar_sa" => Some(Self::ArSa),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::FrFr => "fr_FR",
            Self::PtBr => "pt_BR",
            Self::JaJp => "ja_JP",
            Self::ZhCn => "zh_CN",
            Self::ZhTw => "zh_TW",
            Self::ArSa => "ar_SA",
        }
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate `$body` with `$l` bound to the `fake` locale for `$locale`.
macro_rules! with_locale {
    ($locale:expr, $l:ident => $body:expr) => {
        match $locale {
            $crate::generators::LocaleKey::EnUs => {
                let $l = fake::locales::EN;
                $body
            }
            $crate::generators::LocaleKey::FrFr => {
                let $l = fake::locales::FR_FR;
                $body
            }
            $crate::generators::LocaleKey::PtBr => {
                let $l = fake::locales::PT_BR;
                $body
            }
            $crate::generators::LocaleKey::JaJp => {
                let $l = fake::locales::JA_JP;
                $body
            }
            $crate::generators::LocaleKey::ZhCn => {
                let $l = fake::locales::ZH_CN;
                $body
            }
            $crate::generators::LocaleKey::ZhTw => {
                let $l = fake::locales::ZH_TW;
                $body
            }
            $crate::generators::LocaleKey::ArSa => {
                let $l = fake::locales::AR_SA;
                $body
            }
        }
    };
}

pub(crate) use with_locale;
