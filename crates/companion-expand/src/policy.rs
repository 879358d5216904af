use companion_syntax::{Decl, ModifierList};

/// Whether `member` belongs in the protocol and mock generated for its
/// enclosing type.
///
/// Only instance functions and properties qualify. Members of a public
/// type must be public themselves; members of any other type qualify
/// whatever their own access level.
pub fn included(member: &Decl, enclosing_is_public: bool) -> bool {
    if !matches!(member, Decl::Function(_) | Decl::Variable(_)) {
        return false;
    }
    let modifiers = member.modifiers();
    if modifiers.is_type_level() {
        return false;
    }
    !enclosing_is_public || modifiers.is_public()
}
