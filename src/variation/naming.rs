//! Output file naming
//!
//! Every variant is written once per gender. The gender tokens are the
//! legacy-codepage byte sequences the game client looks for, decoded as
//! Latin-1, and must be reproduced exactly.

/// Female file token.
pub const FEMALE_SUFFIX: &str = "_\u{BF}\u{A9}";
/// Male file token.
pub const MALE_SUFFIX: &str = "_\u{B3}\u{B2}";
/// Tokens in write order.
pub const GENDER_SUFFIXES: [&str; 2] = [FEMALE_SUFFIX, MALE_SUFFIX];

/// Fixed prefix of hair palette files.
pub const HAIR_PREFIX: &str = "\u{B8}\u{D3}\u{B8}\u{AE}";

/// Default number of hair styles on a server.
pub const DEFAULT_STYLE_COUNT: u32 = 40;

/// Strip any trailing gender tokens so they are not written twice.
pub fn clean_name(name: &str) -> &str {
    let mut name = name;
    while let Some(stripped) = GENDER_SUFFIXES.iter().find_map(|s| name.strip_suffix(s)) {
        name = stripped;
    }
    name
}

/// `{clean}{suffix}_{number}.pal`
pub fn variant_file_name(name: &str, suffix: &str, number: u32) -> String {
    format!("{}{}_{}.pal", clean_name(name), suffix, number)
}

/// `{prefix}{style_count}{suffix}_{number}.pal`
pub fn hair_file_name(prefix: &str, style_count: u32, suffix: &str, number: u32) -> String {
    format!("{}{}{}_{}.pal", prefix, style_count, suffix, number)
}

/// How the files of one variant are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingScheme {
    /// One female and one male file per target name
    Targets { names: Vec<String> },
    /// One female and one male hair file
    Hair { prefix: String, style_count: u32 },
}

impl NamingScheme {
    /// Targets naming; an empty list falls back to `default_name`.
    pub fn targets(names: Vec<String>, default_name: &str) -> Self {
        if names.is_empty() {
            NamingScheme::Targets { names: vec![default_name.to_string()] }
        } else {
            NamingScheme::Targets { names }
        }
    }

    pub fn hair(style_count: u32) -> Self {
        NamingScheme::Hair { prefix: HAIR_PREFIX.to_string(), style_count }
    }

    pub fn files_per_variant(&self) -> usize {
        match self {
            NamingScheme::Targets { names } => names.len() * GENDER_SUFFIXES.len(),
            NamingScheme::Hair { .. } => GENDER_SUFFIXES.len(),
        }
    }

    /// File names for the variant numbered `number`, in write order.
    pub fn file_names(&self, number: u32) -> Vec<String> {
        match self {
            NamingScheme::Targets { names } => names
                .iter()
                .flat_map(|name| {
                    GENDER_SUFFIXES.iter().map(move |suffix| variant_file_name(name, suffix, number))
                })
                .collect(),
            NamingScheme::Hair { prefix, style_count } => GENDER_SUFFIXES
                .iter()
                .map(|suffix| hair_file_name(prefix, *style_count, suffix, number))
                .collect(),
        }
    }
}
