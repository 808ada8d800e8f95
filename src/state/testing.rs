//! In-memory backend double shared by the state tests.

use crate::api::{ApiError, ApiErrorKind, ApiResult, BookmarkBackend, OAuthProvider};
use crate::models::{Bookmark, NewBookmark, User, UserMetadata};
use chrono::{Duration, TimeZone, Utc};
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};

#[derive(Default)]
pub(crate) struct MockBackend {
    pub user: RefCell<Option<User>>,
    pub rows: RefCell<Vec<Bookmark>>,

    pub fail_list: Cell<bool>,
    pub fail_insert: Cell<bool>,
    pub fail_delete: Cell<bool>,
    pub fail_user: Cell<bool>,

    pub user_calls: Cell<usize>,
    pub list_calls: Cell<usize>,
    pub insert_calls: Cell<usize>,
    pub delete_calls: Cell<usize>,
    pub sign_in_calls: Cell<usize>,
    pub sign_out_calls: Cell<usize>,

    /// When set, the next delete waits for the paired sender.
    delete_gate: RefCell<Option<oneshot::Receiver<()>>>,

    seq: Cell<i64>,
}

fn bump(c: &Cell<usize>) {
    c.set(c.get() + 1);
}

fn refused(ctx: &str) -> ApiError {
    ApiError {
        kind: ApiErrorKind::Http,
        message: format!("{ctx} (500): mock failure"),
    }
}

impl MockBackend {
    pub fn signed_in(user_id: &str) -> Self {
        let backend = Self::default();
        *backend.user.borrow_mut() = Some(User {
            id: user_id.to_string(),
            email: Some("ada@example.com".to_string()),
            user_metadata: UserMetadata::default(),
        });
        backend
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Backend calls of any kind made so far.
    pub fn calls(&self) -> usize {
        self.user_calls.get()
            + self.list_calls.get()
            + self.insert_calls.get()
            + self.delete_calls.get()
    }

    fn next_row(&self, id: Option<&str>, title: &str, url: &str) -> Bookmark {
        let seq = self.seq.get() + 1;
        self.seq.set(seq);
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Bookmark {
            id: id.map(str::to_string).unwrap_or_else(|| format!("bm-{seq}")),
            title: title.to_string(),
            url: url.to_string(),
            created_at: base + Duration::minutes(seq),
        }
    }

    /// Holds the next `delete_bookmark` call open until the returned sender
    /// fires, so tests can interleave other work with it.
    pub fn hold_delete(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.delete_gate.borrow_mut() = Some(rx);
        tx
    }

    pub fn seed(&self, id: &str, title: &str, url: &str) {
        let row = self.next_row(Some(id), title, url);
        self.rows.borrow_mut().push(row);
    }
}

impl BookmarkBackend for MockBackend {
    async fn current_user(&self) -> ApiResult<Option<User>> {
        bump(&self.user_calls);
        if self.fail_user.get() {
            return Err(refused("Get user failed"));
        }
        Ok(self.user.borrow().clone())
    }

    async fn sign_in_with_oauth(&self, _provider: OAuthProvider, _redirect_to: &str) -> ApiResult<()> {
        bump(&self.sign_in_calls);
        Ok(())
    }

    async fn sign_out(&self) -> ApiResult<()> {
        bump(&self.sign_out_calls);
        self.user.borrow_mut().take();
        Ok(())
    }

    async fn list_bookmarks(&self, _user_id: &str) -> ApiResult<Vec<Bookmark>> {
        bump(&self.list_calls);
        if self.fail_list.get() {
            return Err(refused("List bookmarks failed"));
        }
        let mut rows = self.rows.borrow().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_bookmark(&self, record: &NewBookmark) -> ApiResult<Bookmark> {
        bump(&self.insert_calls);
        if self.fail_insert.get() {
            return Err(refused("Insert bookmark failed"));
        }
        let row = self.next_row(None, &record.title, &record.url);
        self.rows.borrow_mut().push(row.clone());
        Ok(row)
    }

    async fn delete_bookmark(&self, id: &str) -> ApiResult<()> {
        bump(&self.delete_calls);
        let gate = self.delete_gate.borrow_mut().take();
        if let Some(gate) = gate {
            gate.await.ok();
        }
        if self.fail_delete.get() {
            return Err(refused("Delete bookmark failed"));
        }
        self.rows.borrow_mut().retain(|b| b.id != id);
        Ok(())
    }
}
