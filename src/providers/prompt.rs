/// The generation prompt sent to the model.
///
/// It demands a strict-JSON reply matching [`crate::RecipeRecord`] and is
/// loaded from `prompt.txt` at compile time using the `include_str!` macro,
/// making it easy to edit without dealing with Rust string syntax.
pub const RECIPE_PROMPT: &str = include_str!("prompt.txt");
