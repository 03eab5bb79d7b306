//! In-memory implementation of every store contract.
//!
//! All state sits behind one async mutex, so each call is a unit of work in
//! the same sense as a committed transaction. The role catalog is seeded
//! with the same rows as the SQL migrations.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use social_core::error::{AppError, ConflictReason};
use social_core::result::AppResult;
use social_core::types::{FeedQuery, SortDirection};
use social_entity::{
    Comment, FeedItem, Invitation, NewComment, NewPost, NewUser, PasswordHash, Post, PostChanges,
    Role, User,
};

use crate::store::{CommentStore, FollowerStore, PostStore, RoleStore, Storage, UserStore};

#[derive(Debug, Clone)]
struct UserRecord {
    id: i64,
    username: String,
    email: String,
    password: PasswordHash,
    is_active: bool,
    role_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CommentRecord {
    id: i64,
    post_id: i64,
    user_id: i64,
    content: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct State {
    next_id: i64,
    roles: Vec<Role>,
    users: BTreeMap<i64, UserRecord>,
    invitations: HashMap<String, Invitation>,
    posts: BTreeMap<i64, Post>,
    comments: Vec<CommentRecord>,
    /// `(user_id, follower_id)` pairs.
    followers: BTreeSet<(i64, i64)>,
}

impl State {
    fn seeded() -> Self {
        let role = |id: i64, name: &str, description: &str, level: i32| Role {
            id,
            name: name.to_string(),
            description: description.to_string(),
            level,
        };
        Self {
            next_id: 1,
            roles: vec![
                role(1, "user", "A user can create posts and comments", 1),
                role(2, "moderator", "A moderator can update other users posts", 2),
                role(3, "admin", "An admin can update and delete other users posts", 3),
            ],
            users: BTreeMap::new(),
            invitations: HashMap::new(),
            posts: BTreeMap::new(),
            comments: Vec::new(),
            followers: BTreeSet::new(),
        }
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn hydrate(&self, record: &UserRecord) -> AppResult<User> {
        let role = self
            .roles
            .iter()
            .find(|r| r.id == record.role_id)
            .cloned()
            .ok_or_else(|| AppError::internal(format!("Role {} missing", record.role_id)))?;
        Ok(User {
            id: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
            password: record.password.clone(),
            is_active: record.is_active,
            role_id: record.role_id,
            role,
            created_at: record.created_at,
        })
    }

    fn username_of(&self, user_id: i64) -> String {
        self.users
            .get(&user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn comment(&self, record: &CommentRecord) -> Comment {
        Comment {
            id: record.id,
            post_id: record.post_id,
            user_id: record.user_id,
            content: record.content.clone(),
            created_at: record.created_at,
            username: self.username_of(record.user_id),
        }
    }
}

/// A process-local store backing every contract.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Create an empty store with the seeded role catalog.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::seeded())),
        }
    }

    /// Bind this store to every contract of a [`Storage`] bundle.
    pub fn storage(&self) -> Storage {
        Storage {
            users: Arc::new(self.clone()),
            roles: Arc::new(self.clone()),
            posts: Arc::new(self.clone()),
            comments: Arc::new(self.clone()),
            followers: Arc::new(self.clone()),
        }
    }

    /// Move a principal to another role, as an operator would out of band.
    #[cfg(any(test, feature = "test-util"))]
    pub async fn assign_role(&self, user_id: i64, role_name: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let role_id = state
            .roles
            .iter()
            .find(|r| r.name == role_name)
            .map(|r| r.id)
            .ok_or_else(|| AppError::not_found(format!("Role '{role_name}' not found")))?;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        user.role_id = role_id;
        Ok(())
    }

    /// Keys of every stored invitation.
    #[cfg(any(test, feature = "test-util"))]
    pub async fn invitation_keys(&self) -> Vec<String> {
        self.state.lock().await.invitations.keys().cloned().collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        state.users.get(&id).map(|u| state.hydrate(u)).transpose()
    }

    async fn find_active_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        state
            .users
            .values()
            .find(|u| u.email == email && u.is_active)
            .map(|u| state.hydrate(u))
            .transpose()
    }

    async fn create_with_invitation(
        &self,
        draft: &NewUser,
        token_hash: &str,
        ttl: Duration,
    ) -> AppResult<User> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::internal(format!("Invitation TTL out of range: {e}")))?;
        let mut state = self.state.lock().await;

        if state.users.values().any(|u| u.email == draft.email) {
            return Err(AppError::conflict_with(ConflictReason::DuplicateEmail));
        }
        if state.users.values().any(|u| u.username == draft.username) {
            return Err(AppError::conflict_with(ConflictReason::DuplicateUsername));
        }
        if state.invitations.contains_key(token_hash) {
            return Err(AppError::database("Invitation token already exists"));
        }
        let role_id = state
            .roles
            .iter()
            .find(|r| r.name == draft.role)
            .map(|r| r.id)
            .ok_or_else(|| AppError::database(format!("Role '{}' not found", draft.role)))?;

        let now = Utc::now();
        let id = state.allocate_id();
        let record = UserRecord {
            id,
            username: draft.username.clone(),
            email: draft.email.clone(),
            password: draft.password.clone(),
            is_active: false,
            role_id,
            created_at: now,
        };
        let user = state.hydrate(&record)?;
        state.users.insert(id, record);
        state.invitations.insert(
            token_hash.to_string(),
            Invitation {
                token: token_hash.to_string(),
                user_id: id,
                expiry: now + ttl,
            },
        );
        Ok(user)
    }

    async fn activate(&self, token_hash: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        let user_id = state
            .invitations
            .get(token_hash)
            .filter(|inv| inv.is_live(now))
            .map(|inv| inv.user_id)
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;
        user.is_active = true;
        state.invitations.retain(|_, inv| inv.user_id != user_id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.users.remove(&id).is_none() {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        state.invitations.retain(|_, inv| inv.user_id != id);
        state.followers.retain(|(user, follower)| *user != id && *follower != id);
        let owned: BTreeSet<i64> = state
            .posts
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        state.posts.retain(|post_id, _| !owned.contains(post_id));
        state
            .comments
            .retain(|c| c.user_id != id && !owned.contains(&c.post_id));
        Ok(())
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let state = self.state.lock().await;
        Ok(state.roles.iter().find(|r| r.name == name).cloned())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create(&self, post: &NewPost) -> AppResult<Post> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&post.user_id) {
            return Err(AppError::database(format!("User {} not found", post.user_id)));
        }
        let now = Utc::now();
        let id = state.allocate_id();
        let created = Post {
            id,
            title: post.title.clone(),
            content: post.content.clone(),
            user_id: post.user_id,
            tags: post.tags.clone(),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        state.posts.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Post>> {
        Ok(self.state.lock().await.posts.get(&id).cloned())
    }

    async fn update(
        &self,
        id: i64,
        expected_version: i32,
        changes: &PostChanges,
    ) -> AppResult<Post> {
        let mut state = self.state.lock().await;
        let post = state
            .posts
            .get_mut(&id)
            .filter(|p| p.version == expected_version)
            .ok_or_else(|| AppError::conflict_with(ConflictReason::VersionMismatch))?;

        changes.apply_to(post);
        post.version += 1;
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.posts.remove(&id).is_none() {
            return Err(AppError::not_found(format!("Post {id} not found")));
        }
        state.comments.retain(|c| c.post_id != id);
        Ok(())
    }

    async fn feed(&self, user_id: i64, query: &FeedQuery) -> AppResult<Vec<FeedItem>> {
        let state = self.state.lock().await;
        let mut items: Vec<FeedItem> = state
            .posts
            .values()
            .filter(|p| p.user_id == user_id || state.followers.contains(&(p.user_id, user_id)))
            .map(|p| FeedItem {
                post: p.clone(),
                username: state.username_of(p.user_id),
                comments_count: state.comments.iter().filter(|c| c.post_id == p.id).count() as i64,
            })
            .collect();

        items.sort_by_key(|item| (item.post.created_at, item.post.id));
        if query.sort == SortDirection::Desc {
            items.reverse();
        }

        Ok(items
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create(&self, comment: &NewComment) -> AppResult<Comment> {
        let mut state = self.state.lock().await;
        if !state.posts.contains_key(&comment.post_id) {
            return Err(AppError::not_found(format!(
                "Post {} not found",
                comment.post_id
            )));
        }
        let id = state.allocate_id();
        let record = CommentRecord {
            id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            content: comment.content.clone(),
            created_at: Utc::now(),
        };
        let created = state.comment(&record);
        state.comments.push(record);
        Ok(created)
    }

    async fn list_by_post(&self, post_id: i64) -> AppResult<Vec<Comment>> {
        let state = self.state.lock().await;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| state.comment(c))
            .collect();
        comments.sort_by_key(|c| std::cmp::Reverse((c.created_at, c.id)));
        Ok(comments)
    }
}

#[async_trait]
impl FollowerStore for MemoryStore {
    async fn follow(&self, follower_id: i64, user_id: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&user_id) {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        if !state.followers.insert((user_id, follower_id)) {
            return Err(AppError::conflict_with(ConflictReason::DuplicateFollow));
        }
        Ok(())
    }

    async fn unfollow(&self, follower_id: i64, user_id: i64) -> AppResult<()> {
        self.state
            .lock()
            .await
            .followers
            .remove(&(user_id, follower_id));
        Ok(())
    }
}
