//! Locale-independent generators: numbers, identifiers, dates and text
//! patterns.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use crate::errors::GeneratorError;
use crate::generators::{
    GeneratedValue, Generator, GeneratorContext, GeneratorRegistry, bounded, constraint,
};
use crate::params::{ParamKind, ParamMap, ParamSpec};

const DEFAULT_INT_MIN: i64 = 0;
const DEFAULT_INT_MAX: i64 = 9999;
const DEFAULT_LEFT_DIGITS: i64 = 3;
const DEFAULT_RIGHT_DIGITS: i64 = 2;
const MAX_FLOAT_DIGITS: i64 = 15;
const MAX_NUMBER_DIGITS: i64 = 18;
const DEFAULT_START: &str = "-30y";
const DEFAULT_END: &str = "today";
const DEFAULT_MAX_AGE: i64 = 115;
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const INT_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min", ParamKind::Int, false),
    ParamSpec::new("max", ParamKind::Int, false),
    ParamSpec::new("step", ParamKind::Int, false),
];
const PYINT_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min_value", ParamKind::Int, false),
    ParamSpec::new("max_value", ParamKind::Int, false),
    ParamSpec::new("step", ParamKind::Int, false),
];
const NUMBER_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("digits", ParamKind::Int, false),
    ParamSpec::new("fix_len", ParamKind::Bool, false),
];
const FLOAT_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("left_digits", ParamKind::Int, false),
    ParamSpec::new("right_digits", ParamKind::Int, false),
    ParamSpec::new("positive", ParamKind::Bool, false),
    ParamSpec::new("min_value", ParamKind::Float, false),
    ParamSpec::new("max_value", ParamKind::Float, false),
];
const DATE_RANGE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("start_date", ParamKind::String, false),
    ParamSpec::new("end_date", ParamKind::String, false),
];
const BIRTH_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("minimum_age", ParamKind::Int, false),
    ParamSpec::new("maximum_age", ParamKind::Int, false),
];
const TRUTH_PARAMS: &[ParamSpec] = &[ParamSpec::new("truth_probability", ParamKind::Int, false)];
const CHANCE_PARAMS: &[ParamSpec] =
    &[ParamSpec::new("chance_of_getting_true", ParamKind::Int, false)];
const ELEMENT_PARAMS: &[ParamSpec] = &[ParamSpec::new("elements", ParamKind::String, true)];
const PATTERN_PARAMS: &[ParamSpec] = &[ParamSpec::new("text", ParamKind::String, false)];

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(IntRangeGenerator {
        id: "random_int",
        keys: ("min", "max"),
    }));
    registry.register_generator(Box::new(IntRangeGenerator {
        id: "pyint",
        keys: ("min_value", "max_value"),
    }));
    registry.register_generator(Box::new(RandomDigitGenerator));
    registry.register_generator(Box::new(RandomNumberGenerator));
    registry.register_generator(Box::new(FloatGenerator { id: "pyfloat" }));
    registry.register_generator(Box::new(FloatGenerator { id: "pydecimal" }));
    registry.register_generator(Box::new(BoolGenerator {
        id: "pybool",
        key: "truth_probability",
    }));
    registry.register_generator(Box::new(BoolGenerator {
        id: "boolean",
        key: "chance_of_getting_true",
    }));
    registry.register_generator(Box::new(UuidGenerator));
    registry.register_generator(Box::new(CoordinateGenerator {
        id: "latitude",
        limit: 90.0,
    }));
    registry.register_generator(Box::new(CoordinateGenerator {
        id: "longitude",
        limit: 180.0,
    }));
    registry.register_generator(Box::new(DateGenerator { id: "date" }));
    registry.register_generator(Box::new(DateGenerator { id: "date_between" }));
    registry.register_generator(Box::new(DateOfBirthGenerator));
    registry.register_generator(Box::new(TimestampGenerator {
        id: "date_time",
        format: TimestampFormat::Native,
    }));
    registry.register_generator(Box::new(TimestampGenerator {
        id: "date_time_between",
        format: TimestampFormat::Native,
    }));
    registry.register_generator(Box::new(TimestampGenerator {
        id: "iso8601",
        format: TimestampFormat::Iso8601,
    }));
    registry.register_generator(Box::new(TimestampGenerator {
        id: "unix_time",
        format: TimestampFormat::Unix,
    }));
    registry.register_generator(Box::new(TimeGenerator));
    registry.register_generator(Box::new(DatePartGenerator { id: "year" }));
    registry.register_generator(Box::new(DatePartGenerator { id: "month" }));
    registry.register_generator(Box::new(RandomElementGenerator));
    registry.register_generator(Box::new(RandomLetterGenerator));
    registry.register_generator(Box::new(PatternGenerator {
        id: "numerify",
        default: "###",
    }));
    registry.register_generator(Box::new(PatternGenerator {
        id: "lexify",
        default: "????",
    }));
    registry.register_generator(Box::new(PatternGenerator {
        id: "bothify",
        default: "## ??",
    }));
    registry.register_generator(Box::new(SsnGenerator));
}

struct IntRangeGenerator {
    id: &'static str,
    keys: (&'static str, &'static str),
}

impl Generator for IntRangeGenerator {
    fn id(&self) -> &'static str {
        self.id
    }

    fn provider(&self) -> &'static str {
        "number"
    }

    fn params(&self) -> &'static [ParamSpec] {
        if self.id == "pyint" {
            PYINT_PARAMS
        } else {
            INT_PARAMS
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let (min_key, max_key) = self.keys;
        let min = params.get_i64(min_key).unwrap_or(DEFAULT_INT_MIN);
        let max = params.get_i64(max_key).unwrap_or(DEFAULT_INT_MAX);
        let step = params.get_i64("step").unwrap_or(1);
        if min > max {
            return Err(constraint(format!(
                "{}: {min_key} must be <= {max_key}",
                self.id
            )));
        }
        if step <= 0 {
            return Err(constraint(format!("{}: step must be positive", self.id)));
        }
        let slots = (max.abs_diff(min) / step.unsigned_abs()).min(i64::MAX as u64) as i64;
        let pick = rng.random_range(0..=slots);
        Ok(GeneratedValue::Int(min.saturating_add(pick.saturating_mul(step))))
    }
}

struct RandomDigitGenerator;

impl Generator for RandomDigitGenerator {
    fn id(&self) -> &'static str {
        "random_digit"
    }

    fn provider(&self) -> &'static str {
        "number"
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        Ok(GeneratedValue::Int(rng.random_range(0..=9)))
    }
}

struct RandomNumberGenerator;

impl Generator for RandomNumberGenerator {
    fn id(&self) -> &'static str {
        "random_number"
    }

    fn provider(&self) -> &'static str {
        "number"
    }

    fn params(&self) -> &'static [ParamSpec] {
        NUMBER_PARAMS
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let digits = match params.get_i64("digits") {
            Some(_) => bounded(params, "digits", 0, 1, MAX_NUMBER_DIGITS)? as u32,
            None => rng.random_range(1..=9),
        };
        let upper = 10_i64.pow(digits) - 1;
        let lower = if params.get_bool("fix_len").unwrap_or(false) {
            10_i64.pow(digits - 1)
        } else {
            0
        };
        Ok(GeneratedValue::Int(rng.random_range(lower..=upper)))
    }
}

struct FloatGenerator {
    id: &'static str,
}

impl Generator for FloatGenerator {
    fn id(&self) -> &'static str {
        self.id
    }

    fn provider(&self) -> &'static str {
        "number"
    }

    fn params(&self) -> &'static [ParamSpec] {
        FLOAT_PARAMS
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let left = bounded(params, "left_digits", DEFAULT_LEFT_DIGITS, 0, MAX_FLOAT_DIGITS)?;
        let right = bounded(params, "right_digits", DEFAULT_RIGHT_DIGITS, 0, MAX_FLOAT_DIGITS)?;
        let positive = params.get_bool("positive").unwrap_or(false);
        let magnitude = 10_f64.powi(left as i32);

        let min = params.get_f64("min_value");
        let max = params.get_f64("max_value");
        let value = if min.is_some() || max.is_some() {
            let lo = min.unwrap_or(if positive { 0.0 } else { -magnitude });
            let hi = max.unwrap_or(magnitude);
            if lo > hi {
                return Err(constraint(format!(
                    "{}: min_value must be <= max_value",
                    self.id
                )));
            }
            if !(hi - lo).is_finite() {
                return Err(constraint(format!(
                    "{}: min_value..max_value span is too wide",
                    self.id
                )));
            }
            rng.random_range(lo..=hi)
        } else {
            let value = rng.random_range(0.0..magnitude);
            if !positive && rng.random_bool(0.5) {
                -value
            } else {
                value
            }
        };

        let scale = 10_f64.powi(right as i32);
        Ok(GeneratedValue::Float((value * scale).round() / scale))
    }
}

struct BoolGenerator {
    id: &'static str,
    key: &'static str,
}

impl Generator for BoolGenerator {
    fn id(&self) -> &'static str {
        self.id
    }

    fn provider(&self) -> &'static str {
        "number"
    }

    fn params(&self) -> &'static [ParamSpec] {
        if self.key == "truth_probability" {
            TRUTH_PARAMS
        } else {
            CHANCE_PARAMS
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let percent = bounded(params, self.key, 50, 0, 100)?;
        Ok(GeneratedValue::Bool(rng.random_bool(percent as f64 / 100.0)))
    }
}

struct UuidGenerator;

impl Generator for UuidGenerator {
    fn id(&self) -> &'static str {
        "uuid4"
    }

    fn provider(&self) -> &'static str {
        "identifier"
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
        Ok(GeneratedValue::Text(uuid.to_string()))
    }
}

struct CoordinateGenerator {
    id: &'static str,
    limit: f64,
}

impl Generator for CoordinateGenerator {
    fn id(&self) -> &'static str {
        self.id
    }

    fn provider(&self) -> &'static str {
        "geo"
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let value = rng.random_range(-self.limit..=self.limit);
        Ok(GeneratedValue::Float((value * 1e6).round() / 1e6))
    }
}

/// `date` draws from the Unix epoch up to today; `date_between` takes a range.
struct DateGenerator {
    id: &'static str,
}

impl Generator for DateGenerator {
    fn id(&self) -> &'static str {
        self.id
    }

    fn provider(&self) -> &'static str {
        "date_time"
    }

    fn params(&self) -> &'static [ParamSpec] {
        if self.id == "date" {
            &[]
        } else {
            DATE_RANGE_PARAMS
        }
    }

    fn generate(
        &self,
        ctx: &GeneratorContext,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let (start, end) = if self.id == "date" {
            (epoch(), ctx.today)
        } else {
            date_range(ctx, params)?
        };
        Ok(GeneratedValue::Date(random_date(start, end, rng)?))
    }
}

struct DateOfBirthGenerator;

impl Generator for DateOfBirthGenerator {
    fn id(&self) -> &'static str {
        "date_of_birth"
    }

    fn provider(&self) -> &'static str {
        "date_time"
    }

    fn params(&self) -> &'static [ParamSpec] {
        BIRTH_PARAMS
    }

    fn generate(
        &self,
        ctx: &GeneratorContext,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let min_age = bounded(params, "minimum_age", 0, 0, DEFAULT_MAX_AGE)?;
        let max_age = bounded(params, "maximum_age", DEFAULT_MAX_AGE, 0, 200)?;
        if min_age > max_age {
            return Err(constraint(
                "date_of_birth: minimum_age must be <= maximum_age",
            ));
        }
        let latest = shift_months(ctx.today, -(min_age as i64) * 12)?;
        let earliest = shift_months(ctx.today, -(max_age as i64 + 1) * 12)?
            .checked_add_days(Days::new(1))
            .ok_or_else(|| constraint("date_of_birth: date out of range"))?;
        Ok(GeneratedValue::Date(random_date(earliest, latest, rng)?))
    }
}

#[derive(Clone, Copy)]
enum TimestampFormat {
    Native,
    Iso8601,
    Unix,
}

struct TimestampGenerator {
    id: &'static str,
    format: TimestampFormat,
}

impl Generator for TimestampGenerator {
    fn id(&self) -> &'static str {
        self.id
    }

    fn provider(&self) -> &'static str {
        "date_time"
    }

    fn params(&self) -> &'static [ParamSpec] {
        if self.id == "date_time_between" {
            DATE_RANGE_PARAMS
        } else {
            &[]
        }
    }

    fn generate(
        &self,
        ctx: &GeneratorContext,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let (start, end) = if self.id == "date_time_between" {
            date_range(ctx, params)?
        } else {
            (epoch(), ctx.today)
        };
        let stamp = random_timestamp(start, end, rng)?;
        Ok(match self.format {
            TimestampFormat::Native => GeneratedValue::Timestamp(stamp),
            TimestampFormat::Iso8601 => {
                GeneratedValue::Text(stamp.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
            TimestampFormat::Unix => GeneratedValue::Int(stamp.and_utc().timestamp()),
        })
    }
}

struct TimeGenerator;

impl Generator for TimeGenerator {
    fn id(&self) -> &'static str {
        "time"
    }

    fn provider(&self) -> &'static str {
        "date_time"
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let seconds = rng.random_range(0..86_400u32);
        let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
            .unwrap_or(NaiveTime::MIN);
        Ok(GeneratedValue::Time(time))
    }
}

/// `year` and `month` render as text, zero-padded for months.
struct DatePartGenerator {
    id: &'static str,
}

impl Generator for DatePartGenerator {
    fn id(&self) -> &'static str {
        self.id
    }

    fn provider(&self) -> &'static str {
        "date_time"
    }

    fn generate(
        &self,
        ctx: &GeneratorContext,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let date = random_date(epoch(), ctx.today, rng)?;
        let text = if self.id == "year" {
            date.year().to_string()
        } else {
            format!("{:02}", date.month())
        };
        Ok(GeneratedValue::Text(text))
    }
}

struct RandomElementGenerator;

impl Generator for RandomElementGenerator {
    fn id(&self) -> &'static str {
        "random_element"
    }

    fn provider(&self) -> &'static str {
        "text"
    }

    fn params(&self) -> &'static [ParamSpec] {
        ELEMENT_PARAMS
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let raw = params.get_text("elements").unwrap_or_default();
        let elements: Vec<&str> = raw
            .split('|')
            .map(str::trim)
            .filter(|element| !element.is_empty())
            .collect();
        let choice = elements
            .choose(rng)
            .ok_or_else(|| constraint("random_element: elements must not be empty"))?;
        Ok(GeneratedValue::Text((*choice).to_string()))
    }
}

struct RandomLetterGenerator;

impl Generator for RandomLetterGenerator {
    fn id(&self) -> &'static str {
        "random_letter"
    }

    fn provider(&self) -> &'static str {
        "text"
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        Ok(GeneratedValue::Text(random_letter(rng).to_string()))
    }
}

/// `#` becomes a digit, `%` a non-zero digit and `?` a letter. `numerify`
/// only replaces digits and `lexify` only letters.
struct PatternGenerator {
    id: &'static str,
    default: &'static str,
}

impl Generator for PatternGenerator {
    fn id(&self) -> &'static str {
        self.id
    }

    fn provider(&self) -> &'static str {
        "text"
    }

    fn params(&self) -> &'static [ParamSpec] {
        PATTERN_PARAMS
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        let pattern = params
            .get_text("text")
            .unwrap_or_else(|| self.default.to_string());
        let digits = self.id != "lexify";
        let letters = self.id != "numerify";
        Ok(GeneratedValue::Text(fill_pattern(&pattern, digits, letters, rng)))
    }
}

struct SsnGenerator;

impl Generator for SsnGenerator {
    fn id(&self) -> &'static str {
        "ssn"
    }

    fn provider(&self) -> &'static str {
        "person"
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GeneratorError> {
        Ok(GeneratedValue::Text(fill_pattern("%##-##-####", true, false, rng)))
    }
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn fill_pattern(pattern: &str, digits: bool, letters: bool, rng: &mut dyn RngCore) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '#' if digits => char::from(b'0' + rng.random_range(0..10u8)),
            '%' if digits => char::from(b'0' + rng.random_range(1..10u8)),
            '?' if letters => random_letter(rng),
            other => other,
        })
        .collect()
}

fn random_letter(rng: &mut dyn RngCore) -> char {
    char::from(LETTERS[rng.random_range(0..LETTERS.len())])
}

fn date_range(
    ctx: &GeneratorContext,
    params: &ParamMap<'_>,
) -> Result<(NaiveDate, NaiveDate), GeneratorError> {
    let start = params
        .get_text("start_date")
        .unwrap_or_else(|| DEFAULT_START.to_string());
    let end = params
        .get_text("end_date")
        .unwrap_or_else(|| DEFAULT_END.to_string());
    let start = parse_date_spec(&start, ctx.today)?;
    let end = parse_date_spec(&end, ctx.today)?;
    if start > end {
        return Err(constraint("start_date must not be after end_date"));
    }
    Ok((start, end))
}

/// Parse `today`, `now`, an ISO date or a relative offset such as `-30y`,
/// `+2w`, `-6m` or `-10d`. A bare integer counts days.
pub(crate) fn parse_date_spec(spec: &str, today: NaiveDate) -> Result<NaiveDate, GeneratorError> {
    let spec = spec.trim();
    if spec.eq_ignore_ascii_case("today") || spec.eq_ignore_ascii_case("now") {
        return Ok(today);
    }
    if let Ok(date) = NaiveDate::parse_from_str(spec, "%Y-%m-%d") {
        return Ok(date);
    }

    let invalid = || constraint(format!("invalid date expression '{spec}'"));
    let (body, unit) = match spec.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => (&spec[..spec.len() - 1], c.to_ascii_lowercase()),
        _ => (spec, 'd'),
    };
    let amount: i64 = body.parse().map_err(|_| invalid())?;
    match unit {
        'd' => shift_days(today, amount),
        'w' => shift_days(today, amount.checked_mul(7).ok_or_else(invalid)?),
        'm' => shift_months(today, amount),
        'y' => shift_months(today, amount.checked_mul(12).ok_or_else(invalid)?),
        _ => Err(invalid()),
    }
}

fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate, GeneratorError> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or_else(|| constraint("date out of range"))
}

fn shift_months(date: NaiveDate, months: i64) -> Result<NaiveDate, GeneratorError> {
    let count = u32::try_from(months.unsigned_abs()).map_err(|_| constraint("date out of range"))?;
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(count))
    } else {
        date.checked_sub_months(Months::new(count))
    };
    shifted.ok_or_else(|| constraint("date out of range"))
}

fn random_date(
    start: NaiveDate,
    end: NaiveDate,
    rng: &mut dyn RngCore,
) -> Result<NaiveDate, GeneratorError> {
    if start > end {
        return Err(constraint("start date must not be after end date"));
    }
    let span = (end - start).num_days();
    let offset = rng.random_range(0..=span);
    shift_days(start, offset)
}

fn random_timestamp(
    start: NaiveDate,
    end: NaiveDate,
    rng: &mut dyn RngCore,
) -> Result<NaiveDateTime, GeneratorError> {
    if start > end {
        return Err(constraint("start date must not be after end date"));
    }
    let first = start.and_time(NaiveTime::MIN);
    let span = (end - start).num_seconds() + 86_399;
    let offset = rng.random_range(0..=span);
    first
        .checked_add_signed(TimeDelta::seconds(offset))
        .ok_or_else(|| constraint("date out of range"))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::{Map, Value};

    use super::*;
    use crate::generators::LocaleKey;
    use crate::params::{coerce_params, validate_params};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn run(id: &str, raw: &[&str], seed: u64) -> Result<GeneratedValue, GeneratorError> {
        let registry = GeneratorRegistry::new();
        let generator = registry.generator(id).expect("registered");
        let map: Map<String, Value> = coerce_params(raw.iter().copied()).expect("coerce");
        let params = validate_params(&map, generator.params(), id)?;
        let ctx = GeneratorContext {
            locale: LocaleKey::EnUs,
            today: today(),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generator.generate(&ctx, &params, &mut rng)
    }

    #[test]
    fn random_int_stays_in_range() {
        for seed in 0..50 {
            let GeneratedValue::Int(value) = run("random_int", &["min=1", "max=10"], seed).unwrap()
            else {
                panic!("random_int returns an integer");
            };
            assert!((1..=10).contains(&value));
        }
    }

    #[test]
    fn random_int_honors_step() {
        for seed in 0..20 {
            let GeneratedValue::Int(value) =
                run("random_int", &["min=0", "max=100", "step=25"], seed).unwrap()
            else {
                panic!("random_int returns an integer");
            };
            assert_eq!(value % 25, 0);
        }
    }

    #[test]
    fn inverted_range_is_a_constraint_error() {
        let err = run("random_int", &["min=10", "max=1"], 0).unwrap_err();
        assert!(matches!(err, GeneratorError::Params(_)));
    }

    #[test]
    fn float_range_wider_than_f64_is_a_constraint_error() {
        let huge = format!("1{}.0", "0".repeat(308));
        let min = format!("min_value=-{huge}");
        let max = format!("max_value={huge}");
        let err = run("pyfloat", &[min.as_str(), max.as_str()], 0).unwrap_err();
        assert!(matches!(err, GeneratorError::Params(_)));
    }

    #[test]
    fn pydecimal_respects_digit_counts() {
        let GeneratedValue::Float(value) =
            run("pydecimal", &["left_digits=3", "right_digits=2", "positive=true"], 3).unwrap()
        else {
            panic!("pydecimal returns a float");
        };
        assert!((0.0..1000.0).contains(&value));
        assert!(((value * 100.0).round() - value * 100.0).abs() < 1e-6);
    }

    #[test]
    fn date_between_honors_relative_bounds() {
        for seed in 0..20 {
            let GeneratedValue::Date(date) =
                run("date_between", &["start_date=-2y", "end_date=today"], seed).unwrap()
            else {
                panic!("date_between returns a date");
            };
            assert!(date <= today());
            assert!(date >= NaiveDate::from_ymd_opt(2022, 6, 1).unwrap());
        }
    }

    #[test]
    fn date_spec_forms() {
        assert_eq!(parse_date_spec("today", today()).unwrap(), today());
        assert_eq!(
            parse_date_spec("-6m", today()).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 1).unwrap()
        );
        assert_eq!(
            parse_date_spec("+1w", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()
        );
        assert_eq!(
            parse_date_spec("2020-02-29", today()).unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()
        );
        assert!(parse_date_spec("yesterday-ish", today()).is_err());
    }

    #[test]
    fn date_of_birth_matches_age_bounds() {
        let GeneratedValue::Date(date) =
            run("date_of_birth", &["minimum_age=18", "maximum_age=30"], 9).unwrap()
        else {
            panic!("date_of_birth returns a date");
        };
        let age = today().years_since(date).unwrap();
        assert!((18..=30).contains(&age));
    }

    #[test]
    fn random_element_picks_from_list() {
        let GeneratedValue::Text(choice) =
            run("random_element", &["elements=pending|shipped|delivered"], 4).unwrap()
        else {
            panic!("random_element returns text");
        };
        assert!(["pending", "shipped", "delivered"].contains(&choice.as_str()));
        assert!(run("random_element", &[], 4).is_err());
    }

    #[test]
    fn bothify_fills_digits_and_letters() {
        let GeneratedValue::Text(value) = run("bothify", &["text=##-??"], 5).unwrap() else {
            panic!("bothify returns text");
        };
        let chars: Vec<char> = value.chars().collect();
        assert_eq!(chars.len(), 5);
        assert!(chars[0].is_ascii_digit() && chars[1].is_ascii_digit());
        assert_eq!(chars[2], '-');
        assert!(chars[3].is_ascii_alphabetic() && chars[4].is_ascii_alphabetic());
    }

    #[test]
    fn uuid4_is_a_valid_v4_uuid() {
        let GeneratedValue::Text(value) = run("uuid4", &[], 8).unwrap() else {
            panic!("uuid4 returns text");
        };
        let parsed = uuid::Uuid::parse_str(&value).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn random_number_fixed_length() {
        let GeneratedValue::Int(value) =
            run("random_number", &["digits=10", "fix_len=true"], 2).unwrap()
        else {
            panic!("random_number returns an integer");
        };
        assert_eq!(value.to_string().len(), 10);
    }
}
