/// Prompts offered on the generation page.
///
/// The hosted model is trained on flower imagery, so the defaults stay in
/// that domain. Callers can swap the list wholesale (localization, prompt
/// experiments) via [`StudioPage::with_suggestions`](super::StudioPage::with_suggestions).
pub const DEFAULT_SUGGESTIONS: [&str; 6] = [
    "a beautiful red rose flower",
    "a yellow sunflower with green leaves",
    "a purple orchid flower",
    "a white daisy flower",
    "a pink tulip in bloom",
    "a blue iris flower",
];

pub fn default_suggestions() -> Vec<String> {
    DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}
