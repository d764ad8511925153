use std::collections::BTreeSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A single privilege that can be granted on a relation, column or sequence.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum PrivilegeKind {
    Select,
    Insert,
    Update,
    Delete,
    Truncate,
    References,
    Trigger,
    Usage,
}

impl PrivilegeKind {
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "SELECT" => Some(PrivilegeKind::Select),
            "INSERT" => Some(PrivilegeKind::Insert),
            "UPDATE" => Some(PrivilegeKind::Update),
            "DELETE" => Some(PrivilegeKind::Delete),
            "TRUNCATE" => Some(PrivilegeKind::Truncate),
            "REFERENCES" => Some(PrivilegeKind::References),
            "TRIGGER" => Some(PrivilegeKind::Trigger),
            "USAGE" => Some(PrivilegeKind::Usage),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            PrivilegeKind::Select => "SELECT",
            PrivilegeKind::Insert => "INSERT",
            PrivilegeKind::Update => "UPDATE",
            PrivilegeKind::Delete => "DELETE",
            PrivilegeKind::Truncate => "TRUNCATE",
            PrivilegeKind::References => "REFERENCES",
            PrivilegeKind::Trigger => "TRIGGER",
            PrivilegeKind::Usage => "USAGE",
        }
    }

    /// Whether the privilege may carry a column list.
    pub fn is_column_applicable(&self) -> bool {
        matches!(
            self,
            PrivilegeKind::Select | PrivilegeKind::Insert | PrivilegeKind::Update | PrivilegeKind::References
        )
    }
}

/// What kind of object a privilege set belongs to. Decides what `ALL` expands to.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum PrivilegeTarget {
    Relation,
    Column,
    Sequence,
}

impl PrivilegeTarget {
    pub fn all_privileges(&self) -> &'static [PrivilegeKind] {
        match self {
            PrivilegeTarget::Relation => &[
                PrivilegeKind::Select,
                PrivilegeKind::Insert,
                PrivilegeKind::Update,
                PrivilegeKind::Delete,
                PrivilegeKind::Truncate,
                PrivilegeKind::References,
                PrivilegeKind::Trigger,
            ],
            PrivilegeTarget::Column => &[
                PrivilegeKind::Select,
                PrivilegeKind::Insert,
                PrivilegeKind::Update,
                PrivilegeKind::References,
            ],
            PrivilegeTarget::Sequence => &[
                PrivilegeKind::Usage,
                PrivilegeKind::Select,
                PrivilegeKind::Update,
            ],
        }
    }
}

/// The privileges a single role holds on an object.
#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresPrivilege {
    pub role: String,
    pub granted: BTreeSet<PrivilegeKind>,
    pub grant_option: BTreeSet<PrivilegeKind>,
}

impl PostgresPrivilege {
    pub fn new(role: &str) -> Self {
        PostgresPrivilege {
            role: role.to_string(),
            ..Default::default()
        }
    }

    /// Applies one GRANT (`grant == true`) or REVOKE of `kind`.
    ///
    /// For a grant, `grant_option` means `WITH GRANT OPTION`. For a revoke it means
    /// `GRANT OPTION FOR`, which takes away only the option and leaves the privilege itself.
    pub fn apply(&mut self, kind: PrivilegeKind, grant: bool, grant_option: bool) {
        if grant {
            self.granted.insert(kind);
            if grant_option {
                self.grant_option.insert(kind);
            }
        } else {
            self.grant_option.remove(&kind);
            if !grant_option {
                self.granted.remove(&kind);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

/// Finds the privileges of `role`, creating an empty entry on first reference.
pub(crate) fn get_or_create_privilege<'a>(
    privileges: &'a mut Vec<PostgresPrivilege>,
    role: &str,
) -> &'a mut PostgresPrivilege {
    let position = match privileges.iter().position(|p| p.role == role) {
        Some(position) => position,
        None => {
            privileges.push(PostgresPrivilege::new(role));
            privileges.len() - 1
        }
    };

    &mut privileges[position]
}

/// Renders the statements needed to go from the `old` privilege list to the `new` one.
///
/// `object` is the target clause, such as `TABLE foo` or `SEQUENCE foo_seq`. When `column` is
/// given, every privilege is scoped to that column.
pub(crate) fn get_privilege_changes(
    old: &[PostgresPrivilege],
    new: &[PostgresPrivilege],
    object: &str,
    column: Option<&str>,
) -> Vec<String> {
    let empty = BTreeSet::new();
    let roles = old
        .iter()
        .chain(new.iter())
        .map(|p| p.role.as_str())
        .unique()
        .collect_vec();

    let mut statements = Vec::new();

    for role in roles {
        let old_privilege = old.iter().find(|p| p.role == role);
        let new_privilege = new.iter().find(|p| p.role == role);

        let old_granted = old_privilege.map(|p| &p.granted).unwrap_or(&empty);
        let new_granted = new_privilege.map(|p| &p.granted).unwrap_or(&empty);
        let old_option = old_privilege.map(|p| &p.grant_option).unwrap_or(&empty);
        let new_option = new_privilege.map(|p| &p.grant_option).unwrap_or(&empty);

        let revoked = old_granted.difference(new_granted).copied().collect_vec();
        if !revoked.is_empty() {
            statements.push(format!(
                "REVOKE {} ON {} FROM {};",
                render_kinds(&revoked, column),
                object,
                role
            ));
        }

        let option_revoked = old_option
            .difference(new_option)
            .filter(|k| new_granted.contains(*k))
            .copied()
            .collect_vec();
        if !option_revoked.is_empty() {
            statements.push(format!(
                "REVOKE GRANT OPTION FOR {} ON {} FROM {};",
                render_kinds(&option_revoked, column),
                object,
                role
            ));
        }

        let (with_option, without_option): (Vec<PrivilegeKind>, Vec<PrivilegeKind>) = new_granted
            .iter()
            .copied()
            .filter(|k| {
                !old_granted.contains(k) || (new_option.contains(k) && !old_option.contains(k))
            })
            .partition(|k| new_option.contains(k));

        if !without_option.is_empty() {
            statements.push(format!(
                "GRANT {} ON {} TO {};",
                render_kinds(&without_option, column),
                object,
                role
            ));
        }

        if !with_option.is_empty() {
            statements.push(format!(
                "GRANT {} ON {} TO {} WITH GRANT OPTION;",
                render_kinds(&with_option, column),
                object,
                role
            ));
        }
    }

    statements
}

fn render_kinds(kinds: &[PrivilegeKind], column: Option<&str>) -> String {
    kinds
        .iter()
        .map(|k| match column {
            Some(column) => format!("{} ({})", k.keyword(), column),
            None => k.keyword().to_string(),
        })
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn privilege(role: &str, kinds: &[PrivilegeKind]) -> PostgresPrivilege {
        let mut p = PostgresPrivilege::new(role);
        for kind in kinds {
            p.apply(*kind, true, false);
        }
        p
    }

    #[test]
    fn revoke_grant_option_keeps_privilege() {
        let mut p = PostgresPrivilege::new("app");
        p.apply(PrivilegeKind::Select, true, true);
        assert!(p.grant_option.contains(&PrivilegeKind::Select));

        p.apply(PrivilegeKind::Select, false, true);
        assert!(p.granted.contains(&PrivilegeKind::Select));
        assert!(p.grant_option.is_empty());

        p.apply(PrivilegeKind::Select, false, false);
        assert!(p.is_empty());
    }

    #[test]
    fn unchanged_privileges_render_nothing() {
        let old = vec![privilege("a", &[PrivilegeKind::Select])];
        let new = old.clone();
        assert!(get_privilege_changes(&old, &new, "TABLE t", None).is_empty());
    }

    #[test]
    fn removed_role_is_revoked_per_kind() {
        let old = vec![
            privilege("role_a", &[PrivilegeKind::Select, PrivilegeKind::Insert]),
            privilege("role_b", &[PrivilegeKind::Select, PrivilegeKind::Insert]),
        ];
        let new = vec![privilege("role_a", &[PrivilegeKind::Select, PrivilegeKind::Insert])];

        assert_eq!(
            get_privilege_changes(&old, &new, "TABLE t", None),
            vec!["REVOKE SELECT, INSERT ON TABLE t FROM role_b;"]
        );
    }

    #[test]
    fn added_kinds_and_grant_options() {
        let old = vec![privilege("a", &[PrivilegeKind::Select])];
        let mut with_option = privilege("a", &[PrivilegeKind::Select, PrivilegeKind::Update]);
        with_option.apply(PrivilegeKind::Select, true, true);

        assert_eq!(
            get_privilege_changes(&old, &[with_option], "TABLE t", Some("c")),
            vec![
                "GRANT UPDATE (c) ON TABLE t TO a;",
                "GRANT SELECT (c) ON TABLE t TO a WITH GRANT OPTION;",
            ]
        );
    }
}
