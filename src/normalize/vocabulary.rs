//! Color, accessory and temperament vocabularies.
//!
//! Everything here is a pure function over static tables. The prompt renders its
//! whitelists from these constants, so the instructions sent to the generator and the
//! hints computed locally always agree.

/// Primary coat color whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoatColor {
    Black,
    White,
    Brown,
    Tan,
    Cream,
    Gray,
    Brindle,
    Sable,
    Fawn,
}

impl CoatColor {
    pub const ALL: [CoatColor; 9] = [
        CoatColor::Black,
        CoatColor::White,
        CoatColor::Brown,
        CoatColor::Tan,
        CoatColor::Cream,
        CoatColor::Gray,
        CoatColor::Brindle,
        CoatColor::Sable,
        CoatColor::Fawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoatColor::Black => "black",
            CoatColor::White => "white",
            CoatColor::Brown => "brown",
            CoatColor::Tan => "tan",
            CoatColor::Cream => "cream",
            CoatColor::Gray => "gray",
            CoatColor::Brindle => "brindle",
            CoatColor::Sable => "sable",
            CoatColor::Fawn => "fawn",
        }
    }
}

impl std::fmt::Display for CoatColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum number of coat colors kept after normalization.
pub const MAX_COAT_COLORS: usize = 3;

/// Extra colors allowed for accessories and explicitly mentioned marks.
pub const EXTENDED_COLORS: [&str; 10] = [
    "red", "blue", "green", "yellow", "orange", "pink", "purple", "gold", "silver", "beige",
];

pub const ACCESSORY_TYPES: [&str; 7] = [
    "collar", "harness", "bow", "scarf", "clothes", "muzzle", "shoes",
];

/// Specific items that must be kept as-is rather than generalized to an accessory type.
const ACCESSORY_ITEMS: [&str; 14] = [
    "sweater", "shirt", "vest", "jacket", "raincoat", "hoodie", "dress", "ribbon", "bandana",
    "leash", "necklace", "hat", "boots", "tag",
];

/// Coat color synonyms, most specific phrase first.
///
/// Multi-word and compound entries must precede the words they contain, since the
/// containment pass returns the first hit.
const COAT_SYNONYMS: &[(&str, CoatColor)] = &[
    ("light brown", CoatColor::Tan),
    ("golden brown", CoatColor::Tan),
    ("light tan", CoatColor::Fawn),
    ("dark brown", CoatColor::Brown),
    ("reddish brown", CoatColor::Brown),
    ("jet black", CoatColor::Black),
    ("off white", CoatColor::Cream),
    ("salt and pepper", CoatColor::Gray),
    ("blue merle", CoatColor::Gray),
    ("black", CoatColor::Black),
    ("white", CoatColor::White),
    ("brown", CoatColor::Brown),
    ("tan", CoatColor::Tan),
    ("cream", CoatColor::Cream),
    ("gray", CoatColor::Gray),
    ("brindle", CoatColor::Brindle),
    ("sable", CoatColor::Sable),
    ("fawn", CoatColor::Fawn),
    ("grey", CoatColor::Gray),
    ("silver", CoatColor::Gray),
    ("blue", CoatColor::Gray),
    ("charcoal", CoatColor::Gray),
    ("slate", CoatColor::Gray),
    ("chocolate", CoatColor::Brown),
    ("liver", CoatColor::Brown),
    ("mahogany", CoatColor::Brown),
    ("chestnut", CoatColor::Brown),
    ("coffee", CoatColor::Brown),
    ("red", CoatColor::Tan),
    ("ginger", CoatColor::Tan),
    ("orange", CoatColor::Tan),
    ("golden", CoatColor::Tan),
    ("gold", CoatColor::Tan),
    ("caramel", CoatColor::Tan),
    ("honey", CoatColor::Tan),
    ("apricot", CoatColor::Cream),
    ("beige", CoatColor::Cream),
    ("blonde", CoatColor::Cream),
    ("yellow", CoatColor::Cream),
    ("champagne", CoatColor::Cream),
    ("ivory", CoatColor::Cream),
    ("snow", CoatColor::White),
    ("ebony", CoatColor::Black),
    ("tiger", CoatColor::Brindle),
    ("striped", CoatColor::Brindle),
    ("황갈색", CoatColor::Tan),
    ("갈색", CoatColor::Brown),
    ("밤색", CoatColor::Brown),
    ("초코", CoatColor::Brown),
    ("검정", CoatColor::Black),
    ("검은", CoatColor::Black),
    ("까만", CoatColor::Black),
    ("흰", CoatColor::White),
    ("하얀", CoatColor::White),
    ("백색", CoatColor::White),
    ("크림", CoatColor::Cream),
    ("베이지", CoatColor::Cream),
    ("회색", CoatColor::Gray),
    ("은색", CoatColor::Gray),
    ("브린들", CoatColor::Brindle),
];

/// Normalized temperament vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Temperament {
    Timid,
    Friendly,
    Energetic,
    Aggressive,
    Playful,
}

impl Temperament {
    pub const ALL: [Temperament; 5] = [
        Temperament::Timid,
        Temperament::Friendly,
        Temperament::Energetic,
        Temperament::Aggressive,
        Temperament::Playful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Temperament::Timid => "timid",
            Temperament::Friendly => "friendly",
            Temperament::Energetic => "energetic",
            Temperament::Aggressive => "aggressive",
            Temperament::Playful => "playful",
        }
    }
}

const TEMPERAMENT_SYNONYMS: &[(&str, Temperament)] = &[
    ("timid", Temperament::Timid),
    ("shy", Temperament::Timid),
    ("scared", Temperament::Timid),
    ("fearful", Temperament::Timid),
    ("nervous", Temperament::Timid),
    ("friendly", Temperament::Friendly),
    ("gentle", Temperament::Friendly),
    ("sweet", Temperament::Friendly),
    ("calm", Temperament::Friendly),
    ("affectionate", Temperament::Friendly),
    ("energetic", Temperament::Energetic),
    ("active", Temperament::Energetic),
    ("hyper", Temperament::Energetic),
    ("lively", Temperament::Energetic),
    ("aggressive", Temperament::Aggressive),
    ("growls", Temperament::Aggressive),
    ("bites", Temperament::Aggressive),
    ("playful", Temperament::Playful),
    ("curious", Temperament::Playful),
    ("mischievous", Temperament::Playful),
];

/// Maps a single free-form color to the primary whitelist.
///
/// Tries an exact synonym match first, then looks for a known phrase inside the input
/// (`"very light brown"` → tan). Never returns a color outside [`CoatColor::ALL`].
pub fn normalize_coat_color(input: &str) -> Option<CoatColor> {
    let key = canonical_key(input);
    if key.is_empty() {
        return None;
    }

    if let Some((_, color)) = COAT_SYNONYMS.iter().find(|(phrase, _)| *phrase == key) {
        return Some(*color);
    }

    let words: Vec<&str> = key.split(' ').collect();
    COAT_SYNONYMS
        .iter()
        .find(|(phrase, _)| {
            if phrase.is_ascii() {
                contains_word_sequence(&words, phrase)
            } else {
                key.contains(phrase)
            }
        })
        .map(|(_, color)| *color)
}

/// Splits a comma-separated color hint and normalizes each entry.
///
/// Duplicates are dropped (first occurrence wins) and at most [`MAX_COAT_COLORS`] are kept.
pub fn normalize_coat_colors(input: &str) -> Vec<CoatColor> {
    let mut colors = Vec::with_capacity(MAX_COAT_COLORS);

    for part in split_color_list(input) {
        if colors.len() == MAX_COAT_COLORS {
            break;
        }
        if let Some(color) = normalize_coat_color(&part)
            && !colors.contains(&color)
        {
            colors.push(color);
        }
    }

    colors
}

/// Normalizes a color used on an accessory: extended palette, then coat colors.
pub fn normalize_accessory_color(input: &str) -> Option<&'static str> {
    let key = canonical_key(input);
    if let Some(extended) = EXTENDED_COLORS.iter().find(|c| **c == key) {
        return Some(*extended);
    }
    COAT_SYNONYMS
        .iter()
        .find(|(phrase, _)| *phrase == key)
        .map(|(_, color)| color.as_str())
}

/// Renders an accessory with its color, or with the `uncolored` prefix when none is known.
pub fn accessory_phrase(item: &str, color: Option<&str>) -> String {
    let item = item.trim();
    match color.and_then(normalize_accessory_color) {
        Some(color) => format!("{color} {item}"),
        None => format!("uncolored {item}"),
    }
}

/// Finds accessory mentions in free text, keeping the specific item name.
///
/// The text is split into clauses at `,` `.` `;` `!` `?` and line breaks. An item only
/// takes a color from the few words before it in its own clause, stopping at "and",
/// "or" and "with" (so "red leather collar" is red, "white socks, collar" is not).
/// Items negated in that window ("no", "not", "without") are skipped.
pub fn detect_accessories(features: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for clause in features.split([',', '.', ';', '!', '?', '\n']) {
        let tokens = tokenize(clause);

        for (idx, token) in tokens.iter().enumerate() {
            if !is_accessory_word(token) {
                continue;
            }

            let window = modifier_window(&tokens[..idx]);
            if window.iter().any(|t| NEGATIONS.contains(&t.as_str())) {
                continue;
            }

            let color = window
                .iter()
                .rev()
                .find(|t| normalize_accessory_color(t).is_some())
                .map(String::as_str);

            let phrase = accessory_phrase(token, color);
            if !found.contains(&phrase) {
                found.push(phrase);
            }
        }
    }

    found
}

const NEGATIONS: [&str; 3] = ["no", "not", "without"];

const PHRASE_BREAKS: [&str; 3] = ["and", "or", "with"];

/// Words that may modify the item: at most three, back to the nearest phrase break.
fn modifier_window(preceding: &[String]) -> &[String] {
    let start = preceding
        .iter()
        .rposition(|t| PHRASE_BREAKS.contains(&t.as_str()))
        .map_or(0, |pos| pos + 1)
        .max(preceding.len().saturating_sub(3));
    &preceding[start..]
}

/// First temperament word found in the text, normalized.
pub fn normalize_temperament(features: &str) -> Option<Temperament> {
    tokenize(features).iter().find_map(|token| {
        TEMPERAMENT_SYNONYMS
            .iter()
            .find(|(word, _)| *word == token.as_str())
            .map(|(_, t)| *t)
    })
}

/// `"tan"`, `"tan and white"`, `"black, tan and white"`, or `"unknown"`.
pub fn coat_phrase(colors: &[CoatColor]) -> String {
    match colors {
        [] => "unknown".to_string(),
        [only] => only.as_str().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(CoatColor::as_str).collect();
            format!("{} and {}", head.join(", "), last.as_str())
        }
    }
}

/// Sentence-2 fallback form: `"Appearance summary: [Breed] with [color] coat."`.
pub fn appearance_summary(breed: &str, colors: &[CoatColor]) -> String {
    format!(
        "Appearance summary: {} with {} coat.",
        breed_or_unknown(breed, "Unknown dog"),
        coat_phrase(colors)
    )
}

/// Sentence-3 form: `"[Breed]; colors: [color1], [color2]."`.
pub fn color_summary(breed: &str, colors: &[CoatColor]) -> String {
    let listed = if colors.is_empty() {
        "unknown".to_string()
    } else {
        colors
            .iter()
            .map(CoatColor::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("{}; colors: {}.", breed_or_unknown(breed, "Unknown"), listed)
}

fn breed_or_unknown<'a>(breed: &'a str, unknown: &'a str) -> &'a str {
    let breed = breed.trim();
    if breed.is_empty() { unknown } else { breed }
}

fn is_accessory_word(token: &str) -> bool {
    ACCESSORY_TYPES.contains(&token)
        || ACCESSORY_ITEMS.contains(&token)
        || token
            .strip_suffix('s')
            .is_some_and(|singular| ACCESSORY_TYPES.contains(&singular))
}

fn canonical_key(input: &str) -> String {
    input
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_color_list(input: &str) -> Vec<String> {
    input
        .split([',', '/', '&', ';', '+', '\n'])
        .flat_map(|part| {
            let key = canonical_key(part);
            // "salt and pepper" is a single color; other "a and b" pairs are two.
            if COAT_SYNONYMS.iter().any(|(phrase, _)| *phrase == key) {
                vec![key]
            } else {
                key.split(" and ").map(str::to_string).collect()
            }
        })
        .filter(|part| !part.is_empty())
        .collect()
}

fn contains_word_sequence(words: &[&str], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split(' ').collect();
    words.windows(needle.len()).any(|w| w == needle.as_slice())
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
