//! Trashable kinds - soft-deletable tables and their hard-delete plans

use crate::Table;
use std::fmt;

/// Column carrying the soft-delete timestamp on every trashable table
pub const DATE_DELETED: &str = "dateDeleted";

/// A family of soft-deletable rows
///
/// Each kind has a parent table with a `dateDeleted` column and a fixed set
/// of dependent tables whose rows belong to the parent and must go with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrashableKind {
    /// Content elements: entries, users and anything else stored in `elements`
    Elements,
    /// Entry types
    EntryTypes,
    /// Sections
    Sections,
    /// Asset volumes
    Volumes,
}

/// One hop from a set of ids to the ids of the rows referencing them
///
/// `Link { table: Entries, column: "sectionId" }` turns section ids into the
/// ids of the entries of those sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Referencing table
    pub table: Table,
    /// Column holding the referenced id
    pub column: &'static str,
}

/// Rows of `table` whose `column` holds a parent id, possibly reached
/// through intermediate tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependent {
    /// Dependent table
    pub table: Table,
    /// Column holding the (possibly indirect) parent id
    pub column: &'static str,
    /// Hops from the parent ids, applied in order; empty for direct references
    pub through: &'static [Link],
}

impl Dependent {
    const fn direct(table: Table, column: &'static str) -> Self {
        Self { table, column, through: &[] }
    }

    const fn via(table: Table, column: &'static str, through: &'static [Link]) -> Self {
        Self { table, column, through }
    }
}

const ENTRIES_BY_SECTION: &[Link] = &[Link { table: Table::Entries, column: "sectionId" }];
const ENTRIES_BY_TYPE: &[Link] = &[Link { table: Table::Entries, column: "typeId" }];
const TYPES_BY_SECTION: &[Link] = &[Link { table: Table::EntryTypes, column: "sectionId" }];
const ENTRIES_BY_SECTION_TYPE: &[Link] = &[
    Link { table: Table::EntryTypes, column: "sectionId" },
    Link { table: Table::Entries, column: "typeId" },
];

/// Ordered deletion plan for one kind: dependents first, then the parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlan {
    /// Table carrying `dateDeleted`
    pub parent: Table,
    /// Primary key column of the parent
    pub key: &'static str,
    /// Dependent tables, deleted in this order before the parent
    pub dependents: Vec<Dependent>,
}

impl TrashableKind {
    /// Every kind, in sweep order
    pub const ALL: [TrashableKind; 4] = [
        TrashableKind::Elements,
        TrashableKind::EntryTypes,
        TrashableKind::Sections,
        TrashableKind::Volumes,
    ];

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TrashableKind::Elements => "elements",
            TrashableKind::EntryTypes => "entry_types",
            TrashableKind::Sections => "sections",
            TrashableKind::Volumes => "volumes",
        }
    }

    /// Table carrying the `dateDeleted` column
    pub fn parent(&self) -> Table {
        match self {
            TrashableKind::Elements => Table::Elements,
            TrashableKind::EntryTypes => Table::EntryTypes,
            TrashableKind::Sections => Table::Sections,
            TrashableKind::Volumes => Table::Volumes,
        }
    }

    /// Deletion plan for this kind
    ///
    /// # Examples
    ///
    /// ```
    /// use reclaim_domain::{Table, TrashableKind};
    ///
    /// let plan = TrashableKind::Volumes.plan();
    /// assert_eq!(plan.parent, Table::Volumes);
    /// assert_eq!(plan.dependents[0].table, Table::VolumeFolders);
    /// ```
    pub fn plan(&self) -> DeletionPlan {
        // An entry's element rows go before the entry row the hop reads from
        let dependents = match self {
            TrashableKind::Elements => vec![
                Dependent::direct(Table::Content, "elementId"),
                Dependent::direct(Table::ElementsSites, "elementId"),
                Dependent::direct(Table::Entries, "id"),
                Dependent::direct(Table::Sessions, "userId"),
                Dependent::direct(Table::Users, "id"),
            ],
            TrashableKind::EntryTypes => vec![
                Dependent::via(Table::Content, "elementId", ENTRIES_BY_TYPE),
                Dependent::via(Table::ElementsSites, "elementId", ENTRIES_BY_TYPE),
                Dependent::via(Table::Elements, "id", ENTRIES_BY_TYPE),
                Dependent::direct(Table::Entries, "typeId"),
            ],
            TrashableKind::Sections => vec![
                Dependent::via(Table::Content, "elementId", ENTRIES_BY_SECTION),
                Dependent::via(Table::ElementsSites, "elementId", ENTRIES_BY_SECTION),
                Dependent::via(Table::Elements, "id", ENTRIES_BY_SECTION),
                Dependent::via(Table::Content, "elementId", ENTRIES_BY_SECTION_TYPE),
                Dependent::via(Table::ElementsSites, "elementId", ENTRIES_BY_SECTION_TYPE),
                Dependent::via(Table::Elements, "id", ENTRIES_BY_SECTION_TYPE),
                Dependent::direct(Table::Entries, "sectionId"),
                Dependent::via(Table::Entries, "typeId", TYPES_BY_SECTION),
                Dependent::direct(Table::EntryTypes, "sectionId"),
                Dependent::direct(Table::SectionsSites, "sectionId"),
            ],
            TrashableKind::Volumes => vec![
                Dependent::direct(Table::VolumeFolders, "volumeId"),
            ],
        };

        DeletionPlan {
            parent: self.parent(),
            key: "id",
            dependents,
        }
    }
}

impl fmt::Display for TrashableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
