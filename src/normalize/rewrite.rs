// Unicode-to-ASCII rewrite table.
//
// Built once per run and handed to every normalization call by reference.
// Characters below 0x7F pass through untouched; everything else is looked up
// here and replaced with its ASCII spelling, or with a single space when the
// table has no entry.

use std::collections::HashMap;

/// Read-only lookup from a non-ASCII character to its ASCII replacement.
#[derive(Debug, Clone)]
pub struct RewriteTable {
    map: HashMap<char, &'static str>,
}

impl Default for RewriteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteTable {
    /// Build the table from the built-in character list.
    pub fn new() -> Self {
        Self {
            map: REWRITES.iter().copied().collect(),
        }
    }

    /// Number of mapped characters.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Exact lookup, no fallback.
    pub fn get(&self, c: char) -> Option<&'static str> {
        self.map.get(&c).copied()
    }

    /// Replacement for a single character. Total over every code point:
    /// ASCII below 0x7F is kept, mapped characters use the table, anything
    /// else becomes a space so neighbouring tokens never fuse.
    pub fn rewrite_into(&self, c: char, out: &mut String) {
        if (c as u32) < 0x7F {
            out.push(c);
        } else if let Some(replacement) = self.get(c) {
            out.push_str(replacement);
        } else {
            out.push(' ');
        }
    }

    /// Iterate over every mapped (character, replacement) pair.
    pub fn entries(&self) -> impl Iterator<Item = (char, &'static str)> + '_ {
        self.map.iter().map(|(c, r)| (*c, *r))
    }
}

const REWRITES: &[(char, &str)] = &[
    // Latin-1 Supplement
    ('\u{00A0}', " "),
    ('\u{00A1}', " "),
    ('\u{00A2}', " cents "),
    ('\u{00A3}', " pounds "),
    ('\u{00A4}', " "),
    ('\u{00A5}', " yen "),
    ('\u{00A6}', " "),
    ('\u{00A7}', " "),
    ('\u{00A8}', " "),
    ('\u{00A9}', " "),
    ('\u{00AA}', " "),
    ('\u{00AB}', " "),
    ('\u{00AC}', " "),
    ('\u{00AD}', " "),
    ('\u{00AE}', " "),
    ('\u{00AF}', " "),
    ('\u{00B0}', " degrees "),
    ('\u{00B1}', " plus-or-minus "),
    ('\u{00B2}', " "),
    ('\u{00B3}', " "),
    ('\u{00B4}', "'"),
    ('\u{00B5}', " micro "),
    ('\u{00B6}', " "),
    ('\u{00B7}', " "),
    ('\u{00B8}', " "),
    ('\u{00B9}', " "),
    ('\u{00BA}', " "),
    ('\u{00BB}', " "),
    ('\u{00BC}', " 1/4 "),
    ('\u{00BD}', " 1/2 "),
    ('\u{00BE}', " 3/4 "),
    ('\u{00BF}', " "),
    ('\u{00C0}', "A"),
    ('\u{00C1}', "A"),
    ('\u{00C2}', "A"),
    ('\u{00C3}', "A"),
    ('\u{00C4}', "A"),
    ('\u{00C5}', "A"),
    ('\u{00C6}', "AE"),
    ('\u{00C7}', "C"),
    ('\u{00C8}', "E"),
    ('\u{00C9}', "E"),
    ('\u{00CA}', "E"),
    ('\u{00CB}', "E"),
    ('\u{00CC}', "I"),
    ('\u{00CD}', "I"),
    ('\u{00CE}', "I"),
    ('\u{00CF}', "I"),
    ('\u{00D0}', "Th"),
    ('\u{00D1}', "N"),
    ('\u{00D2}', "O"),
    ('\u{00D3}', "O"),
    ('\u{00D4}', "O"),
    ('\u{00D5}', "O"),
    ('\u{00D6}', "O"),
    ('\u{00D7}', "x"),
    ('\u{00D8}', "O"),
    ('\u{00D9}', "U"),
    ('\u{00DA}', "U"),
    ('\u{00DB}', "U"),
    ('\u{00DC}', "U"),
    ('\u{00DD}', "Y"),
    ('\u{00DE}', "Th"),
    ('\u{00DF}', "ss"),
    ('\u{00E0}', "a"),
    ('\u{00E1}', "a"),
    ('\u{00E2}', "a"),
    ('\u{00E3}', "a"),
    ('\u{00E4}', "a"),
    ('\u{00E5}', "a"),
    ('\u{00E6}', "ae"),
    ('\u{00E7}', "c"),
    ('\u{00E8}', "e"),
    ('\u{00E9}', "e"),
    ('\u{00EA}', "e"),
    ('\u{00EB}', "e"),
    ('\u{00EC}', "i"),
    ('\u{00ED}', "i"),
    ('\u{00EE}', "i"),
    ('\u{00EF}', "i"),
    ('\u{00F0}', "th"),
    ('\u{00F1}', "n"),
    ('\u{00F2}', "o"),
    ('\u{00F3}', "o"),
    ('\u{00F4}', "o"),
    ('\u{00F5}', "o"),
    ('\u{00F6}', "o"),
    ('\u{00F7}', " divided by "),
    ('\u{00F8}', "o"),
    ('\u{00F9}', "u"),
    ('\u{00FA}', "u"),
    ('\u{00FB}', "u"),
    ('\u{00FC}', "u"),
    ('\u{00FD}', "y"),
    ('\u{00FE}', "th"),
    ('\u{00FF}', "y"),
    // Latin Extended-A
    ('\u{0100}', "A"),
    ('\u{0101}', "a"),
    ('\u{0102}', "A"),
    ('\u{0103}', "a"),
    ('\u{0104}', "A"),
    ('\u{0105}', "a"),
    ('\u{0106}', "C"),
    ('\u{0107}', "c"),
    ('\u{0108}', "C"),
    ('\u{0109}', "c"),
    ('\u{010A}', "C"),
    ('\u{010B}', "c"),
    ('\u{010C}', "C"),
    ('\u{010D}', "c"),
    ('\u{010E}', "D"),
    ('\u{010F}', "d"),
    ('\u{0110}', "D"),
    ('\u{0111}', "d"),
    ('\u{0112}', "E"),
    ('\u{0113}', "e"),
    ('\u{0114}', "E"),
    ('\u{0115}', "e"),
    ('\u{0116}', "E"),
    ('\u{0117}', "e"),
    ('\u{0118}', "E"),
    ('\u{0119}', "e"),
    ('\u{011A}', "E"),
    ('\u{011B}', "e"),
    ('\u{011C}', "G"),
    ('\u{011D}', "g"),
    ('\u{011E}', "G"),
    ('\u{011F}', "g"),
    ('\u{0120}', "G"),
    ('\u{0121}', "g"),
    ('\u{0122}', "G"),
    ('\u{0123}', "g"),
    ('\u{0124}', "H"),
    ('\u{0125}', "h"),
    ('\u{0126}', "H"),
    ('\u{0127}', "h"),
    ('\u{0128}', "I"),
    ('\u{0129}', "i"),
    ('\u{012A}', "I"),
    ('\u{012B}', "i"),
    ('\u{012C}', "I"),
    ('\u{012D}', "i"),
    ('\u{012E}', "I"),
    ('\u{012F}', "i"),
    ('\u{0130}', "I"),
    ('\u{0131}', "i"),
    ('\u{0132}', "IJ"),
    ('\u{0133}', "ij"),
    ('\u{0134}', "J"),
    ('\u{0135}', "j"),
    ('\u{0136}', "K"),
    ('\u{0137}', "k"),
    ('\u{0138}', "k"),
    ('\u{0139}', "L"),
    ('\u{013A}', "l"),
    ('\u{013B}', "L"),
    ('\u{013C}', "l"),
    ('\u{013D}', "L"),
    ('\u{013E}', "l"),
    ('\u{013F}', "L"),
    ('\u{0140}', "l"),
    ('\u{0141}', "L"),
    ('\u{0142}', "l"),
    ('\u{0143}', "N"),
    ('\u{0144}', "n"),
    ('\u{0145}', "N"),
    ('\u{0146}', "n"),
    ('\u{0147}', "N"),
    ('\u{0148}', "n"),
    ('\u{0149}', "n"),
    ('\u{014A}', "N"),
    ('\u{014B}', "n"),
    ('\u{014C}', "O"),
    ('\u{014D}', "o"),
    ('\u{014E}', "O"),
    ('\u{014F}', "o"),
    ('\u{0150}', "O"),
    ('\u{0151}', "o"),
    ('\u{0152}', "oe"),
    ('\u{0153}', "R"),
    ('\u{0154}', "R"),
    ('\u{0155}', "r"),
    ('\u{0156}', "R"),
    ('\u{0157}', "r"),
    ('\u{0158}', "R"),
    ('\u{0159}', "r"),
    ('\u{015A}', "S"),
    ('\u{015B}', "s"),
    ('\u{015C}', "S"),
    ('\u{015D}', "s"),
    ('\u{015E}', "S"),
    ('\u{015F}', "s"),
    ('\u{0160}', "S"),
    ('\u{0161}', "s"),
    ('\u{0162}', "T"),
    ('\u{0163}', "t"),
    ('\u{0164}', "T"),
    ('\u{0165}', "t"),
    ('\u{0166}', "T"),
    ('\u{0167}', "t"),
    ('\u{0168}', "U"),
    ('\u{0169}', "u"),
    ('\u{016A}', "U"),
    ('\u{016B}', "u"),
    ('\u{016C}', "U"),
    ('\u{016D}', "u"),
    ('\u{016E}', "U"),
    ('\u{016F}', "u"),
    ('\u{0170}', "U"),
    ('\u{0171}', "u"),
    ('\u{0172}', "U"),
    ('\u{0173}', "u"),
    ('\u{0174}', "W"),
    ('\u{0175}', "w"),
    ('\u{0176}', "Y"),
    ('\u{0177}', "y"),
    ('\u{0178}', "Y"),
    ('\u{0179}', "Z"),
    ('\u{017A}', "z"),
    ('\u{017B}', "Z"),
    ('\u{017C}', "z"),
    ('\u{017D}', "Z"),
    ('\u{017E}', "z"),
    ('\u{017F}', "s"),
    // Latin Extended-B
    ('\u{0180}', "b"),
    ('\u{0181}', "B"),
    ('\u{0182}', "B"),
    ('\u{0183}', "b"),
    ('\u{0184}', "b"),
    ('\u{0185}', "b"),
    ('\u{0186}', "O"),
    ('\u{0187}', "C"),
    ('\u{0188}', "c"),
    ('\u{0189}', "D"),
    ('\u{018A}', "D"),
    ('\u{018B}', "d"),
    ('\u{018C}', "d"),
    ('\u{018D}', " "),
    ('\u{018E}', " "),
    ('\u{018F}', " "),
    ('\u{0190}', "E"),
    ('\u{0191}', "F"),
    ('\u{0192}', "f"),
    ('\u{0193}', "G"),
    ('\u{0194}', " "),
    ('\u{0195}', "hv"),
    ('\u{0196}', "I"),
    ('\u{0197}', "I"),
    ('\u{0198}', "K"),
    ('\u{0199}', "k"),
    ('\u{019A}', "l"),
    ('\u{019B}', " "),
    ('\u{019C}', " "),
    ('\u{019D}', "N"),
    ('\u{019E}', "n"),
    ('\u{019F}', "O"),
    ('\u{0226}', "a"),
    ('\u{0227}', "a"),
    // IPA, spacing modifiers, combining marks
    ('\u{02DC}', " "),
    ('\u{0336}', " "),
    // Greek
    ('\u{0391}', "A"),
    ('\u{03A4}', "T"),
    ('\u{03A9}', " omega "),
    ('\u{03B2}', " beta "),
    ('\u{03BC}', " mu "),
    ('\u{03C0}', " pi "),
    // Cyrillic
    ('\u{0441}', "c"),
    // Other scripts
    ('\u{1E25}', "h"),
    ('\u{1ECB}', "i"),
    ('\u{1F7B}', "u"),
    // General Punctuation
    ('\u{2000}', " "),
    ('\u{2001}', " "),
    ('\u{2009}', " "),
    ('\u{200A}', " "),
    ('\u{200B}', " "),
    ('\u{200E}', " "),
    ('\u{200F}', " "),
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2013}', " "),
    ('\u{2014}', " "),
    ('\u{2015}', " "),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201A}', " "),
    ('\u{201C}', " "),
    ('\u{201D}', " "),
    ('\u{201E}', " "),
    ('\u{201F}', " "),
    ('\u{2020}', " "),
    ('\u{2021}', " "),
    ('\u{2022}', " "),
    ('\u{2023}', " "),
    ('\u{2024}', " "),
    ('\u{2025}', " "),
    ('\u{2026}', " "),
    ('\u{2027}', " "),
    ('\u{2028}', " "),
    ('\u{2029}', "\n"),
    ('\u{202A}', " "),
    ('\u{202B}', " "),
    ('\u{202C}', " "),
    ('\u{202D}', " "),
    ('\u{202E}', " "),
    ('\u{202F}', " "),
    ('\u{2032}', "'"),
    ('\u{2033}', " "),
    ('\u{203B}', " "),
    ('\u{206B}', " "),
    ('\u{206E}', " "),
    ('\u{206F}', " "),
    // Currency
    ('\u{20AC}', " euros "),
    // Letterlike symbols, number forms, arrows, math
    ('\u{2116}', " "),
    ('\u{2122}', " "),
    ('\u{2154}', "2/3"),
    ('\u{2192}', " "),
    ('\u{21FC}', " "),
    ('\u{2212}', "-"),
    ('\u{23AF}', " "),
    // Shapes, symbols, presentation forms
    ('\u{25BA}', " "),
    ('\u{2665}', " "),
    ('\u{FB01}', "fi"),
    ('\u{FF00}', " "),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entry_is_ascii() {
        let table = RewriteTable::new();
        for (c, replacement) in table.entries() {
            assert!(
                replacement.is_ascii(),
                "U+{:04X} maps to non-ASCII {replacement:?}",
                c as u32
            );
        }
    }

    #[test]
    fn test_no_ascii_keys() {
        let table = RewriteTable::new();
        assert!(table.entries().all(|(c, _)| (c as u32) >= 0x7F));
        assert!(table.len() > 300);
    }

    #[test]
    fn test_rewrite_into() {
        let table = RewriteTable::new();
        let mut out = String::new();
        for c in "caf\u{00E9} \u{20AC}\u{4E2D}x".chars() {
            table.rewrite_into(c, &mut out);
        }
        assert_eq!(out, "cafe  euros  x");
    }

    #[test]
    fn test_delete_char_is_not_passed_through() {
        let table = RewriteTable::new();
        let mut out = String::new();
        table.rewrite_into('\u{7F}', &mut out);
        assert_eq!(out, " ");
    }
}
