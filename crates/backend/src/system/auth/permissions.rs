use contracts::system::users::Role;
use contracts::usecases::u501_import_roster::ImportProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ImportUsers,
    ImportMembers,
    ViewDirectory,
}

impl Permission {
    pub fn for_import(profile: ImportProfile) -> Self {
        match profile {
            ImportProfile::User => Permission::ImportUsers,
            ImportProfile::Member => Permission::ImportMembers,
        }
    }
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
    match permission {
        Permission::ImportUsers | Permission::ImportMembers => role.is_admin(),
        Permission::ViewDirectory => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_cannot_import() {
        assert!(has_permission(Role::SuperAdmin, Permission::ImportUsers));
        assert!(has_permission(Role::Admin, Permission::ImportMembers));
        assert!(!has_permission(Role::Staff, Permission::ImportUsers));
        assert!(!has_permission(Role::Staff, Permission::ImportMembers));
        assert!(has_permission(Role::Staff, Permission::ViewDirectory));
    }
}
