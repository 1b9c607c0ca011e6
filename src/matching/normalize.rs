//! Text normalization applied to questions and keywords alike.

use serde::{Deserialize, Serialize};

/// How text is normalized before substring tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// Unicode lowercasing only.
    #[default]
    Lowercase,
    /// Lowercasing followed by diacritic removal (`comisión` → `comision`).
    Fold,
}

impl Normalization {
    /// Normalize `text` according to this mode.
    pub fn apply(self, text: &str) -> String {
        let lower = text.to_lowercase();
        match self {
            Normalization::Lowercase => lower,
            Normalization::Fold => fold_diacritics(&lower),
        }
    }
}

/// Strip combining marks and map precomposed Latin letters to their base letter.
///
/// Precomposed letters from Latin-1 Supplement and Latin Extended-A are
/// mapped. Letters with no canonical decomposition (`ø`, `æ`, `ł`, `đ`) and
/// precomposed letters from other blocks pass through unchanged.
pub fn fold_diacritics(text: &str) -> String {
    text.chars()
        .filter(|c| !is_combining_mark(*c))
        .map(base_letter)
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}' | '\u{1AB0}'..='\u{1AFF}' | '\u{20D0}'..='\u{20FF}')
}

fn base_letter(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => 'A',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => 'C',
        'ď' => 'd',
        'Ď' => 'D',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => 'E',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => 'G',
        'ĥ' => 'h',
        'Ĥ' => 'H',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => 'I',
        'ĵ' => 'j',
        'Ĵ' => 'J',
        'ķ' => 'k',
        'Ķ' => 'K',
        'ĺ' | 'ļ' | 'ľ' => 'l',
        'Ĺ' | 'Ļ' | 'Ľ' => 'L',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ō' | 'ŏ' | 'ő' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ō' | 'Ŏ' | 'Ő' => 'O',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'Ŕ' | 'Ŗ' | 'Ř' => 'R',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => 'S',
        'ţ' | 'ť' => 't',
        'Ţ' | 'Ť' => 'T',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => 'U',
        'ŵ' => 'w',
        'Ŵ' => 'W',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'Ý' | 'Ŷ' | 'Ÿ' => 'Y',
        'ź' | 'ż' | 'ž' => 'z',
        'Ź' | 'Ż' | 'Ž' => 'Z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_keeps_accents() {
        assert_eq!(Normalization::Lowercase.apply("¿Comisión?"), "¿comisión?");
    }

    #[test]
    fn test_fold_strips_accents() {
        assert_eq!(Normalization::Fold.apply("¿Comisión del AÑO?"), "¿comision del ano?");
    }

    #[test]
    fn test_fold_strips_combining_marks() {
        // "e" followed by U+0301 COMBINING ACUTE ACCENT
        assert_eq!(fold_diacritics("condicio\u{0301}n"), "condicion");
    }

    #[test]
    fn test_fold_covers_latin_extended() {
        assert_eq!(fold_diacritics("ýÿőůčšžřęł"), "yyouucszreł");
        assert_eq!(fold_diacritics("ŐRSÉG Ÿ"), "ORSEG Y");
        assert_eq!(fold_diacritics("smørrebrød"), "smørrebrød");
    }
}
