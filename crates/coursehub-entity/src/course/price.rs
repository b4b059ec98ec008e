//! Free-course price detection.
//!
//! Course prices arrive as free-form text evidence from the CRUD layer,
//! so "free" has several spellings. This is the single place that
//! interprets them; the access decision engine's first precedence rule
//! depends on it.

/// Returns true when the given price evidence denotes a free course.
///
/// Free: absent, empty/whitespace, a numeric zero ("0", "0.0", "0.00"),
/// or the literal "free" in any casing. Anything else is a paid price.
pub fn price_is_free(price: Option<&str>) -> bool {
    let Some(raw) = price else {
        return true;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return true;
    }
    if trimmed.eq_ignore_ascii_case("free") {
        return true;
    }
    match trimmed.parse::<f64>() {
        Ok(value) => value == 0.0,
        Err(_) => false,
    }
}
