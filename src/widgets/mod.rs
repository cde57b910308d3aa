pub mod comment_list;

pub use comment_list::{CommentList, CommentListItem, CommentListState};
