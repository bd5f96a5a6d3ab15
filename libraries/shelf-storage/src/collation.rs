//! Locale-aware string ordering for titles and author names
//!
//! Registered on every connection as `shelf_locale`. Comparison is done in
//! three passes: accent- and case-insensitive, then case-insensitive, then raw.
//! "émile" therefore sorts next to "Emile" rather than after "Zola".

use std::cmp::Ordering;

/// Collation name used in `ORDER BY ... COLLATE`
pub const NAME: &str = "shelf_locale";

/// Compare two strings the way a reader expects a book list to be sorted
pub fn compare(a: &str, b: &str) -> Ordering {
    let a = a.trim_start();
    let b = b.trim_start();

    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| lowercase(a).cmp(lowercase(b)))
        .then_with(|| a.cmp(b))
}

fn lowercase(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

fn primary_key(s: &str) -> impl Iterator<Item = char> + '_ {
    lowercase(s).flat_map(fold_accent)
}

/// Map accented Latin letters onto their base letter
fn fold_accent(c: char) -> impl Iterator<Item = char> {
    let folded: &[char] = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => &['a'],
        'æ' => &['a', 'e'],
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => &['c'],
        'ď' | 'đ' | 'ð' => &['d'],
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => &['e'],
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => &['g'],
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => &['i'],
        'ł' | 'ľ' | 'ĺ' | 'ļ' => &['l'],
        'ñ' | 'ń' | 'ņ' | 'ň' => &['n'],
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => &['o'],
        'œ' => &['o', 'e'],
        'ŕ' | 'ř' => &['r'],
        'ś' | 'ŝ' | 'ş' | 'š' => &['s'],
        'ß' => &['s', 's'],
        'ţ' | 'ť' => &['t'],
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => &['u'],
        'ý' | 'ÿ' => &['y'],
        'ź' | 'ż' | 'ž' => &['z'],
        'þ' => &['t', 'h'],
        _ => return Folded::One(Some(c)),
    };
    Folded::Many(folded.iter())
}

enum Folded {
    One(Option<char>),
    Many(std::slice::Iter<'static, char>),
}

impl Iterator for Folded {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self {
            Folded::One(c) => c.take(),
            Folded::Many(iter) => iter.next().copied(),
        }
    }
}
