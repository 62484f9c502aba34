//! Board domain model
//!
//! - `Board`, `BoardList` - the board tree
//! - `Card` and its sub-entities - activities, members, dates, checklists
//! - `BoardClaims`, `BoardRole` - the current user's permissions
//! - `ArchivedCard`, `ArchivedList` - the archive
//!
//! Timestamps are parsed into `chrono::DateTime<Utc>` at deserialization.

pub mod archive;
pub mod board;
pub mod card;
pub mod datetime;
pub mod ordered;
pub mod user;

pub use archive::{ArchivedCard, ArchivedList};
pub use board::{
    AddBoardMember, Board, BoardAllowedUser, BoardClaims, BoardList, BoardPermission, BoardRole,
    BoardRolePermission, BoardUpdate, ListSummary, NewBoard, NewBoardList, RemoveBoardMember,
};
pub use card::{
    ActivityKind, AssignMember, Card, CardActivity, CardChecklist, CardComment, CardDate,
    CardListChange, CardMember, CardUpdate, ChecklistItem, ChecklistItemUpdate, ListChangeEvent,
    NewCard, NewCardDate, NewChecklist, NewComment,
};
pub use ordered::{renumber, sort_by_position, Identified, OrderedById, Positioned, Upsert};
pub use user::{RegisterPayload, User, UserBasicInfo, UserLogin};
