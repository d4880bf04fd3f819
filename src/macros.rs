#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a `Vec<Category>` from `pattern => template` pairs.
///
/// ```
/// let categories = colloquy::categories![
///     "HI" => "Hello!",
///     "HELLO *" => "Hi there.",
/// ];
/// assert_eq!(categories.len(), 2);
/// ```
#[macro_export]
macro_rules! categories {
    ( $( $pattern:expr => $template:expr ),* $(,)? ) => {
        vec![ $( $crate::Category::new($pattern, $template) ),* ]
    };
}
