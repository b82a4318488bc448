mod entity;

use proc_macro::TokenStream;

/// Derive macro for `crud_rust::Entity`.
///
/// Exactly one field must be marked as the key:
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Entity)]
/// #[entity(collection = "tags")]
/// struct Tag {
///     #[entity(key)]
///     id: i32,
///     name: String,
/// }
/// ```
///
/// The collection name defaults to the pluralized snake_case struct name
/// (`Tag` → `"tags"`). Zero key fields, or more than one, is a compile
/// error.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input)
}
