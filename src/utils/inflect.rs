//! Russian numeral agreement.
//!
//! A count selects one of three noun forms: `1 урок`, `2 урока`, `5 уроков`.

/// The three forms a Russian noun takes after a cardinal number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NounForms {
    /// After 1, 21, 31, ...
    pub one: &'static str,
    /// After 2-4, 22-24, ...
    pub few: &'static str,
    /// After 0, 5-20, 25-30, ...
    pub many: &'static str,
}

impl NounForms {
    pub const fn new(one: &'static str, few: &'static str, many: &'static str) -> Self {
        Self { one, few, many }
    }

    /// Pick the form agreeing with `n`.
    ///
    /// Negative counts are never published; `%` truncates toward zero, so they
    /// fall through to `many`.
    pub fn select(&self, n: i64) -> &'static str {
        let last_two = n % 100;
        let last = n % 10;
        if (11..=14).contains(&last_two) {
            self.many
        } else if last == 1 {
            self.one
        } else if (2..=4).contains(&last) {
            self.few
        } else {
            self.many
        }
    }
}

pub const DAYS: NounForms = NounForms::new("день", "дня", "дней");
pub const LESSONS: NounForms = NounForms::new("урок", "урока", "уроков");
pub const GUEST_VISITS: NounForms = NounForms::new("гостевое", "гостевых", "гостевых");

/// Format `n` followed by the agreeing noun form, e.g. `"30 дней"`.
pub fn inflect(n: i64, forms: NounForms) -> String {
    format!("{} {}", n, forms.select(n))
}
