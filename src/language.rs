//! Language identifiers and the English names written into language files.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::TranslatorError;

/// ISO 639 language codes -> English names.
static LANGUAGE_NAMES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("af", "Afrikaans"),
        ("ar", "Arabic"),
        ("az", "Azerbaijani"),
        ("be", "Belarusian"),
        ("bg", "Bulgarian"),
        ("bs", "Bosnian"),
        ("ca", "Catalan"),
        ("cs", "Czech"),
        ("cy", "Welsh"),
        ("da", "Danish"),
        ("de", "German"),
        ("el", "Greek"),
        ("en", "English"),
        ("eo", "Esperanto"),
        ("es", "Spanish"),
        ("et", "Estonian"),
        ("eu", "Basque"),
        ("fa", "Persian"),
        ("fi", "Finnish"),
        ("fo", "Faroese"),
        ("fr", "French"),
        ("ga", "Irish"),
        ("gl", "Galician"),
        ("he", "Hebrew"),
        ("hi", "Hindi"),
        ("hr", "Croatian"),
        ("hu", "Hungarian"),
        ("hy", "Armenian"),
        ("id", "Indonesian"),
        ("is", "Icelandic"),
        ("it", "Italian"),
        ("ja", "Japanese"),
        ("ka", "Georgian"),
        ("kk", "Kazakh"),
        ("ko", "Korean"),
        ("lt", "Lithuanian"),
        ("lv", "Latvian"),
        ("mk", "Macedonian"),
        ("ms", "Malay"),
        ("mt", "Maltese"),
        ("nb", "Norwegian Bokmål"),
        ("nl", "Dutch"),
        ("nn", "Norwegian Nynorsk"),
        ("no", "Norwegian"),
        ("pl", "Polish"),
        ("pt", "Portuguese"),
        ("ro", "Romanian"),
        ("ru", "Russian"),
        ("se", "Northern Sami"),
        ("sk", "Slovak"),
        ("sl", "Slovenian"),
        ("sq", "Albanian"),
        ("sr", "Serbian"),
        ("sv", "Swedish"),
        ("sw", "Kiswahili"),
        ("th", "Thai"),
        ("tr", "Turkish"),
        ("uk", "Ukrainian"),
        ("ur", "Urdu"),
        ("uz", "Uzbek"),
        ("vi", "Vietnamese"),
        ("zh", "Chinese"),
    ]
    .into_iter()
    .collect()
});

/// ISO 3166 region codes -> English names.
static REGION_NAMES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("AR", "Argentina"),
        ("AT", "Austria"),
        ("AU", "Australia"),
        ("BE", "Belgium"),
        ("BR", "Brazil"),
        ("CA", "Canada"),
        ("CH", "Switzerland"),
        ("CN", "China"),
        ("CZ", "Czechia"),
        ("DE", "Germany"),
        ("DK", "Denmark"),
        ("EE", "Estonia"),
        ("ES", "Spain"),
        ("FI", "Finland"),
        ("FR", "France"),
        ("GB", "United Kingdom"),
        ("GR", "Greece"),
        ("HK", "Hong Kong SAR"),
        ("IE", "Ireland"),
        ("IN", "India"),
        ("IS", "Iceland"),
        ("IT", "Italy"),
        ("JP", "Japan"),
        ("KR", "Korea"),
        ("LT", "Lithuania"),
        ("LU", "Luxembourg"),
        ("LV", "Latvia"),
        ("MX", "Mexico"),
        ("NL", "Netherlands"),
        ("NO", "Norway"),
        ("NZ", "New Zealand"),
        ("PL", "Poland"),
        ("PT", "Portugal"),
        ("RO", "Romania"),
        ("RU", "Russia"),
        ("SE", "Sweden"),
        ("SG", "Singapore"),
        ("TR", "Turkey"),
        ("TW", "Taiwan"),
        ("UA", "Ukraine"),
        ("US", "United States"),
        ("ZA", "South Africa"),
    ]
    .into_iter()
    .collect()
});

/// Rejects identifiers that cannot safely name a language file.
///
/// # Errors
/// `InvalidArgument` when the identifier is empty or contains anything other
/// than ASCII alphanumerics, `-` and `_`.
pub fn validate_language(language: &str) -> Result<(), TranslatorError> {
    if language.is_empty() {
        return Err(TranslatorError::invalid_argument("language", "language cannot be empty"));
    }

    if !language.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_')) {
        return Err(TranslatorError::invalid_argument(
            "language",
            format!("'{language}' is not a language identifier"),
        ));
    }

    Ok(())
}

/// Lowercase id stored in the `id` attribute of the language node.
#[must_use]
pub fn language_id(language: &str) -> String {
    language.to_lowercase()
}

/// Human-readable English name of a language.
///
/// # Examples
/// - `en` -> `English`
/// - `sv-SE` -> `Swedish (Sweden)`
/// - `xx-YY` -> `xx-YY` (unknown codes are kept as-is)
#[must_use]
pub fn english_name(language: &str) -> String {
    let mut subtags = language.split(['-', '_']);
    let primary = subtags.next().unwrap_or_default().to_lowercase();

    let Some(name) = LANGUAGE_NAMES.get(primary.as_str()) else {
        return language.to_string();
    };

    // Script subtags (e.g. `Cyrl`) are skipped; the last two-letter subtag is the region.
    let region = subtags
        .filter(|tag| tag.len() == 2)
        .last()
        .map(|tag| {
            let upper = tag.to_uppercase();
            match REGION_NAMES.get(upper.as_str()) {
                Some(region) => (*region).to_string(),
                None => upper,
            }
        });

    region.map_or_else(|| (*name).to_string(), |region| format!("{name} ({region})"))
}

/// Parent of a specific language, e.g. `sv-SE` -> `sv`.
#[must_use]
pub fn parent_language(language: &str) -> Option<&str> {
    language.rsplit_once(['-', '_']).map(|(parent, _)| parent).filter(|p| !p.is_empty())
}
