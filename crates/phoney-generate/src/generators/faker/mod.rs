//! Generators backed by the `fake` data catalog, localized per request.

use fake::Fake;
use fake::faker::{
    address, color, company, creditcard, currency, filesystem, internet, job, lorem, name,
    phone_number,
};
use rand::RngCore;
use rand::seq::IndexedRandom;

use crate::errors::GeneratorError;
use crate::generators::locales::with_locale;
use crate::generators::{
    GeneratedValue, Generator, GeneratorContext, GeneratorRegistry, bounded,
};
use crate::params::{ParamKind, ParamMap, ParamSpec};

const DEFAULT_PASSWORD_LENGTH: i64 = 12;
const DEFAULT_WORDS: i64 = 3;
const DEFAULT_SENTENCE_WORDS: i64 = 6;
const DEFAULT_PARAGRAPH_SENTENCES: i64 = 3;
const DEFAULT_TEXT_CHARS: i64 = 200;
const MIN_TEXT_CHARS: i64 = 5;
const MAX_TEXT_UNITS: i64 = 1000;

const PASSWORD_PARAMS: &[ParamSpec] = &[ParamSpec::new("length", ParamKind::Int, false)];
const WORDS_PARAMS: &[ParamSpec] = &[ParamSpec::new("nb", ParamKind::Int, false)];
const SENTENCE_PARAMS: &[ParamSpec] = &[ParamSpec::new("nb_words", ParamKind::Int, false)];
const PARAGRAPH_PARAMS: &[ParamSpec] = &[ParamSpec::new("nb_sentences", ParamKind::Int, false)];
const TEXT_PARAMS: &[ParamSpec] = &[ParamSpec::new("max_nb_chars", ParamKind::Int, false)];

const COLOR_NAMES: &[&str] = &[
    "AliceBlue", "Aqua", "Beige", "Black", "Blue", "Brown", "Coral", "Crimson", "Cyan",
    "DarkGreen", "Gold", "Gray", "Green", "Indigo", "Ivory", "Khaki", "Lavender", "Lime",
    "Magenta", "Maroon", "Navy", "Olive", "Orange", "Orchid", "Pink", "Plum", "Purple", "Red",
    "Salmon", "Silver", "SkyBlue", "Tan", "Teal", "Tomato", "Turquoise", "Violet", "White",
    "Yellow",
];

type Produce =
    fn(&GeneratorContext, &ParamMap<'_>, &mut dyn RngCore) -> Result<GeneratedValue, GeneratorError>;

/// `$faker(locale, args..)` rendered to a `String` for the context locale.
macro_rules! fake_text {
    ($ctx:expr, $rng:expr, $faker:path $(, $arg:expr)*) => {
        with_locale!($ctx.locale, l => $faker(l $(, $arg)*).fake_with_rng::<String, _>(&mut *$rng))
    };
}

pub fn register(registry: &mut GeneratorRegistry) {
    register_person(registry);
    register_internet(registry);
    register_address(registry);
    register_company(registry);
    register_lorem(registry);
    register_misc(registry);
}

fn register_person(registry: &mut GeneratorRegistry) {
    const PROVIDER: &str = "person";
    add(registry, "name", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, name::raw::Name))
    });
    add(registry, "first_name", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, name::raw::FirstName))
    });
    add(registry, "last_name", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, name::raw::LastName))
    });
    add(registry, "prefix", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, name::raw::Title))
    });
    add(registry, "suffix", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, name::raw::Suffix))
    });
}

fn register_internet(registry: &mut GeneratorRegistry) {
    const PROVIDER: &str = "internet";
    add(registry, "email", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, internet::raw::FreeEmail))
    });
    add(registry, "free_email", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, internet::raw::FreeEmail))
    });
    add(registry, "safe_email", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, internet::raw::SafeEmail))
    });
    add(registry, "user_name", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, internet::raw::Username))
    });
    add(registry, "password", PROVIDER, PASSWORD_PARAMS, |ctx, params, rng| {
        let length = bounded(params, "length", DEFAULT_PASSWORD_LENGTH, 4, 128)?;
        text(fake_text!(ctx, rng, internet::raw::Password, length..length + 1))
    });
    add(registry, "ipv4", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, internet::raw::IPv4))
    });
    add(registry, "ipv6", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, internet::raw::IPv6))
    });
    add(registry, "mac_address", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, internet::raw::MACAddress))
    });
    add(registry, "user_agent", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, internet::raw::UserAgent))
    });
    add(registry, "domain_name", PROVIDER, &[], |ctx, _, rng| {
        text(domain_name(ctx, rng))
    });
    add(registry, "url", PROVIDER, &[], |ctx, _, rng| {
        text(format!("https://www.{}/", domain_name(ctx, rng)))
    });
}

fn register_address(registry: &mut GeneratorRegistry) {
    const PROVIDER: &str = "address";
    add(registry, "city", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, address::raw::CityName))
    });
    add(registry, "state", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, address::raw::StateName))
    });
    add(registry, "state_abbr", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, address::raw::StateAbbr))
    });
    add(registry, "country", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, address::raw::CountryName))
    });
    add(registry, "country_code", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, address::raw::CountryCode))
    });
    add(registry, "street_name", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, address::raw::StreetName))
    });
    add(registry, "building_number", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, address::raw::BuildingNumber))
    });
    add(registry, "zipcode", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, address::raw::ZipCode))
    });
    add(registry, "postcode", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, address::raw::PostCode))
    });
    add(registry, "street_address", PROVIDER, &[], |ctx, _, rng| {
        text(street_address(ctx, rng))
    });
    add(registry, "address", PROVIDER, &[], |ctx, _, rng| {
        let street = street_address(ctx, rng);
        let city = fake_text!(ctx, rng, address::raw::CityName);
        let state = fake_text!(ctx, rng, address::raw::StateAbbr);
        let zip = fake_text!(ctx, rng, address::raw::ZipCode);
        text(format!("{street}, {city}, {state} {zip}"))
    });
}

fn register_company(registry: &mut GeneratorRegistry) {
    const PROVIDER: &str = "company";
    add(registry, "company", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, company::raw::CompanyName))
    });
    add(registry, "company_suffix", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, company::raw::CompanySuffix))
    });
    add(registry, "catch_phrase", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, company::raw::CatchPhrase))
    });
    add(registry, "bs", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, company::raw::Bs))
    });
    add(registry, "industry", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, company::raw::Industry))
    });
    add(registry, "job", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, job::raw::Title))
    });
}

fn register_lorem(registry: &mut GeneratorRegistry) {
    const PROVIDER: &str = "lorem";
    add(registry, "word", PROVIDER, &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, lorem::raw::Word))
    });
    add(registry, "words", PROVIDER, WORDS_PARAMS, |ctx, params, rng| {
        let nb = bounded(params, "nb", DEFAULT_WORDS, 1, MAX_TEXT_UNITS)?;
        let words = (0..nb)
            .map(|_| GeneratedValue::Text(fake_text!(ctx, rng, lorem::raw::Word)))
            .collect();
        Ok(GeneratedValue::List(words))
    });
    add(registry, "sentence", PROVIDER, SENTENCE_PARAMS, |ctx, params, rng| {
        let nb = bounded(params, "nb_words", DEFAULT_SENTENCE_WORDS, 1, MAX_TEXT_UNITS)?;
        text(fake_text!(ctx, rng, lorem::raw::Sentence, nb..nb + 1))
    });
    add(registry, "paragraph", PROVIDER, PARAGRAPH_PARAMS, |ctx, params, rng| {
        let nb = bounded(params, "nb_sentences", DEFAULT_PARAGRAPH_SENTENCES, 1, MAX_TEXT_UNITS)?;
        text(fake_text!(ctx, rng, lorem::raw::Paragraph, nb..nb + 1))
    });
    add(registry, "text", PROVIDER, TEXT_PARAMS, |ctx, params, rng| {
        let max = bounded(params, "max_nb_chars", DEFAULT_TEXT_CHARS, MIN_TEXT_CHARS, 100_000)?;
        text(bounded_text(ctx, rng, max))
    });
    add(registry, "slug", PROVIDER, &[], |ctx, _, rng| {
        let words: Vec<String> = (0..3)
            .map(|_| fake_text!(ctx, rng, lorem::raw::Word).to_lowercase())
            .collect();
        text(words.join("-"))
    });
}

fn register_misc(registry: &mut GeneratorRegistry) {
    add(registry, "phone_number", "phone", &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, phone_number::raw::PhoneNumber))
    });
    add(registry, "cell_number", "phone", &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, phone_number::raw::CellNumber))
    });
    add(registry, "color_name", "color", &[], |_, _, rng| {
        text(COLOR_NAMES.choose(rng).copied().unwrap_or("Black").to_string())
    });
    add(registry, "hex_color", "color", &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, color::raw::HexColor))
    });
    add(registry, "rgb_color", "color", &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, color::raw::RgbColor))
    });
    add(registry, "credit_card_number", "finance", &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, creditcard::raw::CreditCardNumber))
    });
    add(registry, "currency_code", "finance", &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, currency::raw::CurrencyCode))
    });
    add(registry, "currency_name", "finance", &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, currency::raw::CurrencyName))
    });
    add(registry, "file_name", "filesystem", &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, filesystem::raw::FileName))
    });
    add(registry, "file_extension", "filesystem", &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, filesystem::raw::FileExtension))
    });
    add(registry, "file_path", "filesystem", &[], |ctx, _, rng| {
        text(fake_text!(ctx, rng, filesystem::raw::FilePath))
    });
}

struct FakerGenerator {
    id: &'static str,
    provider: &'static str,
    params: &'static [ParamSpec],
    produce: Produce,
}

impl Generator for FakerGenerator {
    fn id(&self) -> &'static str {
        self.id
    }

    fn provider(&self) -> &'static str {
        self.provider
    }

    fn params(&self) -> &'static [ParamSpec] {
        self.params
    }

    fn generate(
        &self,
        ctx: &GeneratorContext,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        (self.produce)(ctx, params, rng)
    }
}

fn add(
    registry: &mut GeneratorRegistry,
    id: &'static str,
    provider: &'static str,
    params: &'static [ParamSpec],
    produce: Produce,
) {
    registry.register_generator(Box::new(FakerGenerator {
        id,
        provider,
        params,
        produce,
    }));
}

fn text(value: String) -> Result<GeneratedValue, GeneratorError> {
    Ok(GeneratedValue::Text(value))
}

fn street_address(ctx: &GeneratorContext, rng: &mut dyn RngCore) -> String {
    let number = fake_text!(ctx, rng, address::raw::BuildingNumber);
    let street = fake_text!(ctx, rng, address::raw::StreetName);
    format!("{number} {street}")
}

/// Host name built from an ASCII label and a locale domain suffix.
fn domain_name(ctx: &GeneratorContext, rng: &mut dyn RngCore) -> String {
    let label: String = fake::faker::name::raw::LastName(fake::locales::EN)
        .fake_with_rng::<String, _>(&mut *rng)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let label = if label.is_empty() {
        "example".to_string()
    } else {
        label
    };
    let suffix = fake_text!(ctx, rng, internet::raw::DomainSuffix);
    format!("{label}.{suffix}")
}

/// Whole sentences up to `max` characters; a first sentence that is already
/// too long is cut at a character boundary.
fn bounded_text(ctx: &GeneratorContext, rng: &mut dyn RngCore, max: usize) -> String {
    let mut out = String::new();
    loop {
        let sentence = fake_text!(ctx, rng, lorem::raw::Sentence, 3..10);
        let needed = if out.is_empty() {
            sentence.chars().count()
        } else {
            sentence.chars().count() + 1
        };
        if out.chars().count() + needed > max {
            if out.is_empty() {
                out = sentence.chars().take(max).collect();
            }
            return out;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&sentence);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::{Map, Value};

    use super::*;
    use crate::generators::LocaleKey;
    use crate::params::validate_params;

    fn run(id: &str, locale: LocaleKey, raw: Map<String, Value>) -> GeneratedValue {
        let registry = GeneratorRegistry::new();
        let generator = registry.generator(id).expect("registered");
        let params = validate_params(&raw, generator.params(), id).expect("valid params");
        let ctx = GeneratorContext {
            locale,
            today: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        generator.generate(&ctx, &params, &mut rng).expect("generate")
    }

    #[test]
    fn every_locale_produces_text_for_names() {
        for locale in LocaleKey::SUPPORTED {
            let value = run("name", *locale, Map::new());
            assert!(matches!(value, GeneratedValue::Text(ref text) if !text.is_empty()));
        }
    }

    #[test]
    fn words_returns_requested_number_of_items() {
        let mut raw = Map::new();
        raw.insert("nb".to_string(), Value::from(4));
        let GeneratedValue::List(items) = run("words", LocaleKey::EnUs, raw) else {
            panic!("words returns a list");
        };
        assert_eq!(items.len(), 4);
    }

    #[test]
    fn text_respects_max_chars() {
        let mut raw = Map::new();
        raw.insert("max_nb_chars".to_string(), Value::from(40));
        let GeneratedValue::Text(value) = run("text", LocaleKey::EnUs, raw) else {
            panic!("text returns text");
        };
        assert!(!value.is_empty());
        assert!(value.chars().count() <= 40);
    }

    #[test]
    fn url_and_domain_are_ascii_hosts() {
        let GeneratedValue::Text(url) = run("url", LocaleKey::JaJp, Map::new()) else {
            panic!("url returns text");
        };
        assert!(url.starts_with("https://www."));
        assert!(url.ends_with('/'));
    }

    #[test]
    fn password_rejects_out_of_range_length() {
        let registry = GeneratorRegistry::new();
        let generator = registry.generator("password").unwrap();
        let mut raw = Map::new();
        raw.insert("length".to_string(), Value::from(1));
        let params = validate_params(&raw, generator.params(), "password").unwrap();
        let ctx = GeneratorContext {
            locale: LocaleKey::EnUs,
            today: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(generator.generate(&ctx, &params, &mut rng).is_err());
    }
}
