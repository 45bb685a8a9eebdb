//! Text-level helpers for scraped markup: price recovery and title cleanup.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

/// Plausible price range, in whole currency units, for a value read from
/// page text. Anything outside it is an unrelated number picked up from markup.
pub const SCRAPED_PRICE_BOUNDS: RangeInclusive<u64> = 1..=100_000;

const NUMERIC_ENTITIES: [&str; 4] = ["&nbsp;", "&#160;", "&thinsp;", "&#8201;"];

static PRICE_IN_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    let sep = r"(?:\s|&nbsp;|&#160;|&thinsp;|&#8201;)";
    Regex::new(&format!(
        r"(\d{{1,3}}(?:{sep}\d{{3}})+|\d+){sep}*(?:₽|&#8381;|руб(?:лей|ля|ль|\.|\b))"
    ))
    .expect("valid regex")
});

/// A call to action after a separator, or the storefront's
/// "купить по выгодной цене" tail. A bare verb inside the title is kept.
static MARKETING_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?:\s*[-–—|,:]\s*(?:купить|заказать|buy now|buy online|shop now)\b",
        r"|\s+(?:купить|заказать) по выгодной цене\b).*$",
    ))
    .expect("valid regex")
});

static SITE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[-–—|]\s*(?:wildberries|вайлдберриз|интернет-магазин)\b.*$")
        .expect("valid regex")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapses runs of whitespace (including non-breaking spaces) and trims.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[must_use]
pub fn within_price_bounds(value: u64) -> bool {
    SCRAPED_PRICE_BOUNDS.contains(&value)
}

/// Reads a price from a text fragment such as `"1 299 ₽"` by keeping its
/// digits. Returns `None` when no digits remain or the value is out of bounds.
#[must_use]
pub fn parse_price_text(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<u64>().ok().filter(|v| within_price_bounds(*v))
}

/// Scans raw markup for the first currency-adjacent number within
/// [`SCRAPED_PRICE_BOUNDS`].
#[must_use]
pub fn scan_price(markup: &str) -> Option<u64> {
    PRICE_IN_MARKUP.captures_iter(markup).find_map(|caps| {
        let number = caps.get(1)?.as_str();
        let stripped = NUMERIC_ENTITIES
            .iter()
            .fold(number.to_string(), |acc, entity| acc.replace(entity, ""));
        parse_price_text(&stripped)
    })
}

/// Strips trailing marketing and site-name clauses from a page title.
#[must_use]
pub fn clean_title(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let without_marketing = MARKETING_SUFFIX.replace(&collapsed, "");
    let without_site = SITE_SUFFIX.replace(&without_marketing, "");
    without_site
        .trim_end_matches(|c: char| {
            c.is_whitespace() || matches!(c, '-' | '–' | '—' | '|' | ',' | ':')
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_text_keeps_digits() {
        assert_eq!(parse_price_text("1 299 ₽"), Some(1299));
        assert_eq!(parse_price_text("2\u{a0}490\u{a0}руб."), Some(2490));
    }

    #[test]
    fn parse_price_text_rejects_out_of_bounds() {
        assert_eq!(parse_price_text("999999₽"), None);
        assert_eq!(parse_price_text("0 ₽"), None);
        assert_eq!(parse_price_text("нет в наличии"), None);
    }

    #[test]
    fn scan_price_finds_grouped_amount() {
        let markup = r#"<span class="price">1 299 ₽</span>"#;
        assert_eq!(scan_price(markup), Some(1299));
    }

    #[test]
    fn scan_price_handles_entities() {
        let markup = "<b>Цена: 2&nbsp;490&nbsp;₽</b>";
        assert_eq!(scan_price(markup), Some(2490));
    }

    #[test]
    fn scan_price_rejects_implausible_match() {
        assert_eq!(scan_price("<div>999999₽</div>"), None);
    }

    #[test]
    fn scan_price_skips_to_next_plausible_match() {
        let markup = "<div>999999₽</div><div>1 050 руб</div>";
        assert_eq!(scan_price(markup), Some(1050));
    }

    #[test]
    fn scan_price_ignores_unrelated_number_before_price() {
        let markup = "Артикул 18671335 1 299 ₽";
        assert_eq!(scan_price(markup), Some(1299));
    }

    #[test]
    fn scan_price_none_without_currency() {
        assert_eq!(scan_price("<div>Артикул 18671335</div>"), None);
    }

    #[test]
    fn scan_price_ignores_words_starting_with_currency_abbreviation() {
        assert_eq!(
            scan_price("<p>Мужская футболка, подходит под 48 рубашку</p>"),
            None
        );
        assert_eq!(scan_price("<p>Кольцо с 3 рубинами</p>"), None);
    }

    #[test]
    fn scan_price_accepts_spelled_out_currency() {
        assert_eq!(scan_price("<p>Цена 1 490 рублей</p>"), Some(1490));
        assert_eq!(scan_price("<p>Цена 990 руб.</p>"), Some(990));
        assert_eq!(scan_price("<p>Цена 750 руб</p>"), Some(750));
    }

    #[test]
    fn clean_title_strips_marketing_clause() {
        assert_eq!(
            clean_title("Кроссовки Nike Air — купить по выгодной цене в интернет-магазине"),
            "Кроссовки Nike Air"
        );
    }

    #[test]
    fn clean_title_strips_site_name() {
        assert_eq!(clean_title("Кроссовки Nike Air | Wildberries"), "Кроссовки Nike Air");
    }

    #[test]
    fn clean_title_strips_english_call_to_action() {
        assert_eq!(clean_title("Desk lamp - Buy now with free delivery"), "Desk lamp");
    }

    #[test]
    fn clean_title_strips_storefront_tail_without_separator() {
        assert_eq!(
            clean_title("Кроссовки Nike Air купить по выгодной цене в интернет-магазине"),
            "Кроссовки Nike Air"
        );
    }

    #[test]
    fn clean_title_keeps_call_to_action_inside_title() {
        assert_eq!(
            clean_title("Книга Как купить квартиру без ипотеки"),
            "Книга Как купить квартиру без ипотеки"
        );
        assert_eq!(
            clean_title("Книга Как купить квартиру без ипотеки — купить в интернет-магазине"),
            "Книга Как купить квартиру без ипотеки"
        );
    }

    #[test]
    fn clean_title_leaves_plain_title() {
        assert_eq!(clean_title("  Кружка   керамическая  "), "Кружка керамическая");
    }
}
