//! Identifier inference.
//!
//! Pure functions deriving identifiers from type names: acronym-aware
//! lower-camel "bean" identifiers, and deterministic flattened names for
//! generic type references.

use crate::ir::TypeReference;

/// Joins a raw type name to its first type argument.
pub const OF: &str = "Of";

/// Joins consecutive type arguments.
pub const AND: &str = "And";

/// Derive a lower-camel bean identifier from a PascalCase type name.
///
/// Let `k` be the length of the leading run of upper-case ASCII letters.
/// With `k == 1` only the first character is lowercased; with `k > 1` the
/// first `k - 1` characters are lowercased, so the last capital of an
/// acronym prefix starts the next word:
///
/// ```
/// use crudgen_core::naming::bean_name;
///
/// assert_eq!(bean_name("UserRepository"), "userRepository");
/// assert_eq!(bean_name("HTTPUserRepository"), "httpUserRepository");
/// ```
///
/// A name that does not start with an upper-case letter is returned as is.
pub fn bean_name(type_name: &str) -> String {
    let run = type_name
        .bytes()
        .take_while(|b| b.is_ascii_uppercase())
        .count();

    let lowered = match run {
        0 => return type_name.to_string(),
        1 => 1,
        k => k - 1,
    };

    // The run is ASCII, so `lowered` is a char boundary.
    let mut name = type_name[..lowered].to_ascii_lowercase();
    name.push_str(&type_name[lowered..]);
    name
}

/// Flatten a possibly generic type reference into an identifier.
///
/// `List<String>` becomes `ListOfString`, `Map<String, Long>` becomes
/// `MapOfStringAndLong`; nested arguments are flattened recursively.
pub fn flattened_name(ty: &TypeReference) -> String {
    let mut name = ty.name().to_string();
    if ty.is_parameterized() {
        name.push_str(OF);
        let arguments: Vec<String> = ty.arguments().iter().map(flattened_name).collect();
        name.push_str(&arguments.join(AND));
    }
    name
}
