mod add_bookmark;
mod bookmark_list;
pub mod ui;

pub(crate) use add_bookmark::AddBookmarkForm;
pub(crate) use bookmark_list::BookmarkList;
