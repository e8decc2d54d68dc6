//! Derives the `information_schema.columns` precision fields from a type
//! written the way `format_type()` prints it, so that configured columns
//! compare equal to introspected ones without repeating those fields in YAML.

/// PostgreSQL reports this octet length for unbounded text types.
const UNBOUNDED_OCTET_LENGTH: i32 = 1_073_741_824;

/// Bytes per character in a UTF8 database.
const MAX_BYTES_PER_CHAR: i32 = 4;

const DEFAULT_TIME_PRECISION: i32 = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDetails {
    pub character_maximum_length: Option<i32>,
    pub character_octet_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_precision_radix: Option<i32>,
    pub numeric_scale: Option<i32>,
    pub datetime_precision: Option<i32>,
    pub interval_type: Option<String>,
}

impl TypeDetails {
    fn characters(length: Option<i32>) -> Self {
        Self {
            character_maximum_length: length,
            character_octet_length: Some(
                length.map_or(UNBOUNDED_OCTET_LENGTH, |n| n * MAX_BYTES_PER_CHAR),
            ),
            ..Self::default()
        }
    }

    fn numeric(precision: Option<i32>, radix: i32, scale: Option<i32>) -> Self {
        Self {
            numeric_precision: precision,
            numeric_precision_radix: Some(radix),
            numeric_scale: scale,
            ..Self::default()
        }
    }

    fn datetime(precision: i32) -> Self {
        Self {
            datetime_precision: Some(precision),
            ..Self::default()
        }
    }
}

/// Splits `name(args) rest` into `("name rest", [args])`.
fn split_modifiers(data_type: &str) -> (String, Vec<i32>) {
    let Some(open) = data_type.find('(') else {
        return (data_type.to_string(), Vec::new());
    };
    let Some(close) = data_type[open..].find(')').map(|i| open + i) else {
        return (data_type.to_string(), Vec::new());
    };
    let args = data_type[open + 1..close]
        .split(',')
        .filter_map(|a| a.trim().parse().ok())
        .collect();
    let base = format!("{}{}", &data_type[..open], &data_type[close + 1..]);
    (base.split_whitespace().collect::<Vec<_>>().join(" "), args)
}

/// Rewrites common type aliases into the spelling `format_type()` uses, so
/// `varchar(32)` and `character varying(32)` compare equal. Anything that is
/// not a known alias comes back trimmed but otherwise untouched.
pub fn canonical(data_type: &str) -> String {
    let trimmed = data_type.trim();
    let (element, array) = match trimmed.strip_suffix("[]") {
        Some(element) => (element.trim_end(), "[]"),
        None => (trimmed, ""),
    };

    let lower = element.to_ascii_lowercase();
    let (name, modifiers) = match lower.find('(') {
        Some(open) if lower.ends_with(')') => (lower[..open].trim(), &lower[open..]),
        _ => (lower.as_str(), ""),
    };

    let canonical = match (name, modifiers) {
        ("int" | "int4", "") => "integer".to_string(),
        ("int2", "") => "smallint".to_string(),
        ("int8", "") => "bigint".to_string(),
        ("bool", "") => "boolean".to_string(),
        ("float4", "") => "real".to_string(),
        ("float8", "") => "double precision".to_string(),
        ("varchar", m) => format!("character varying{m}"),
        ("char" | "bpchar", "") => "character(1)".to_string(),
        ("char" | "bpchar", m) => format!("character{m}"),
        ("decimal", m) => format!("numeric{m}"),
        ("timestamptz", m) => format!("timestamp{m} with time zone"),
        ("timestamp", m) => format!("timestamp{m} without time zone"),
        ("timetz", m) => format!("time{m} with time zone"),
        ("time", m) => format!("time{m} without time zone"),
        _ => return trimmed.to_string(),
    };
    format!("{canonical}{array}")
}

/// Infers precision fields for `data_type`. Arrays and types this function
/// does not know report nothing, matching what `information_schema` shows
/// for them.
pub fn infer(data_type: &str) -> TypeDetails {
    let data_type = data_type.trim().to_ascii_lowercase();
    if data_type.ends_with("[]") {
        return TypeDetails::default();
    }
    let (base, args) = split_modifiers(&data_type);
    let first = args.first().copied();

    match base.as_str() {
        "character varying" | "varchar" => TypeDetails::characters(first),
        "character" | "char" | "bpchar" => TypeDetails::characters(Some(first.unwrap_or(1))),
        "text" => TypeDetails::characters(None),
        "smallint" | "int2" => TypeDetails::numeric(Some(16), 2, Some(0)),
        "integer" | "int" | "int4" => TypeDetails::numeric(Some(32), 2, Some(0)),
        "bigint" | "int8" => TypeDetails::numeric(Some(64), 2, Some(0)),
        "real" | "float4" => TypeDetails::numeric(Some(24), 2, None),
        "double precision" | "float8" => TypeDetails::numeric(Some(53), 2, None),
        "numeric" | "decimal" => match first {
            Some(precision) => {
                TypeDetails::numeric(Some(precision), 10, Some(args.get(1).copied().unwrap_or(0)))
            }
            None => TypeDetails::numeric(None, 10, None),
        },
        "date" => TypeDetails::datetime(0),
        "timestamp without time zone"
        | "timestamp with time zone"
        | "timestamp"
        | "timestamptz"
        | "time without time zone"
        | "time with time zone"
        | "time"
        | "timetz" => TypeDetails::datetime(first.unwrap_or(DEFAULT_TIME_PRECISION)),
        interval if interval.starts_with("interval") => {
            let fields = interval.trim_start_matches("interval").trim();
            TypeDetails {
                interval_type: (!fields.is_empty()).then(|| fields.to_ascii_uppercase()),
                ..TypeDetails::datetime(first.unwrap_or(DEFAULT_TIME_PRECISION))
            }
        }
        _ => TypeDetails::default(),
    }
}
