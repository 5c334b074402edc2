use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskboard_shared::{LoginRequest, Priority, Todo, UserRef};

use crate::api::{Api, ApiError, SessionStore};
use crate::edit::{EditDraft, EditField};
use crate::settings::SettingsDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    TaskList,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VimMode {
    Normal,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient user-visible message, cleared on the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn cycle_priority(current: Option<Priority>, forward: bool) -> Priority {
    let all = Priority::ALL;
    match current {
        None => {
            if forward {
                all[0]
            } else {
                all[all.len() - 1]
            }
        }
        Some(p) => {
            let idx = all.iter().position(|x| *x == p).unwrap_or(0);
            let idx = if forward {
                (idx + 1) % all.len()
            } else {
                (idx + all.len() - 1) % all.len()
            };
            all[idx]
        }
    }
}

pub struct App<A: Api, S: SessionStore> {
    pub api: A,
    pub session: S,
    pub view: View,
    pub vim_mode: VimMode,

    // Loading state
    pub loading: bool,
    pub loading_message: String,
    pub notice: Option<Notice>,

    // Login form
    pub login_email: String,
    pub login_password: String,
    pub login_field: LoginField,

    // Task list
    pub todos: Vec<Todo>,
    pub selected_todo: usize,

    // Edit modal + assignee directory
    pub edit: Option<EditDraft>,
    pub users: Vec<UserRef>,

    // Settings form
    pub settings: Option<SettingsDraft>,
}

impl<A: Api, S: SessionStore> App<A, S> {
    pub fn new(mut api: A, session: S) -> Self {
        let view = match session.current() {
            Some(creds) => {
                api.set_token(Some(creds.token.clone()));
                View::TaskList
            }
            None => View::Login,
        };

        Self {
            api,
            session,
            view,
            vim_mode: VimMode::Normal,
            loading: false,
            loading_message: String::new(),
            notice: None,
            login_email: String::new(),
            login_password: String::new(),
            login_field: LoginField::Email,
            todos: Vec::new(),
            selected_todo: 0,
            edit: None,
            users: Vec::new(),
            settings: None,
        }
    }

    pub fn set_loading(&mut self, loading: bool, message: &str) {
        self.loading = loading;
        self.loading_message = message.to_string();
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        });
    }

    pub fn notify_success(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Success,
            text: text.into(),
        });
    }

    /// Server-reported messages are shown verbatim; transport and server
    /// failures get a generic notice and a log line.
    fn notify_api_error(&mut self, context: &'static str, err: ApiError) {
        match err {
            ApiError::Application(msg) => self.notify_error(msg),
            ApiError::Unauthorized => self.notify_error("Not authenticated"),
            ApiError::NotFound => self.notify_error("Resource not found"),
            err => {
                tracing::error!(error = %err, "{}", context);
                self.notify_error("Something went wrong. Please try again.");
            }
        }
    }

    /// Handle key events, returns true if app should quit
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        // Clear any notice on the next key press
        if self.notice.is_some() && key.code != KeyCode::Esc {
            self.notice = None;
        }

        // Global quit with Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        if self.edit.is_some() {
            return self.handle_edit_key(key).await;
        }

        match self.view {
            View::Login => self.handle_login_key(key).await,
            View::TaskList => self.handle_task_list_key(key).await,
            View::Settings => self.handle_settings_key(key).await,
        }
    }

    // ============ Login ============

    async fn handle_login_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('q') if self.vim_mode == VimMode::Normal => return Ok(true),
            KeyCode::Esc => {
                if self.vim_mode == VimMode::Insert {
                    self.vim_mode = VimMode::Normal;
                }
            }
            KeyCode::Char('i') if self.vim_mode == VimMode::Normal => {
                self.vim_mode = VimMode::Insert;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.login_field = match self.login_field {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            KeyCode::Enter => {
                if !self.login_email.is_empty() && !self.login_password.is_empty() {
                    self.do_login().await;
                }
            }
            KeyCode::Char(c) if self.vim_mode == VimMode::Insert => match self.login_field {
                LoginField::Email => self.login_email.push(c),
                LoginField::Password => self.login_password.push(c),
            },
            KeyCode::Backspace if self.vim_mode == VimMode::Insert => match self.login_field {
                LoginField::Email => {
                    self.login_email.pop();
                }
                LoginField::Password => {
                    self.login_password.pop();
                }
            },
            _ => {}
        }

        Ok(false)
    }

    async fn do_login(&mut self) {
        self.set_loading(true, "Logging in...");

        let req = LoginRequest {
            email: self.login_email.clone(),
            password: self.login_password.clone(),
        };

        match self.api.login(req).await {
            Ok(creds) => {
                self.api.set_token(Some(creds.token.clone()));
                if let Err(e) = self.session.replace(creds) {
                    tracing::warn!(error = %e, "could not persist session");
                }
                self.login_password.clear();
                self.vim_mode = VimMode::Normal;
                self.view = View::TaskList;
                self.load_todos().await;
            }
            Err(err) => {
                self.login_password.clear();
                self.notify_api_error("login failed", err);
            }
        }

        self.set_loading(false, "");
    }

    // ============ Task list ============

    async fn handle_task_list_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('r') => self.load_todos().await,
            KeyCode::Char('s') => {
                self.settings = Some(SettingsDraft::seed(self.session.current()));
                self.view = View::Settings;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_todo < self.todos.len().saturating_sub(1) {
                    self.selected_todo += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.selected_todo > 0 {
                    self.selected_todo -= 1;
                }
            }
            KeyCode::Enter => self.open_edit().await,
            _ => {}
        }

        Ok(false)
    }

    pub async fn load_todos(&mut self) {
        self.set_loading(true, "Loading tasks...");

        match self.api.list_todos().await {
            Ok(todos) => {
                self.todos = todos;
                if self.selected_todo >= self.todos.len() {
                    self.selected_todo = self.todos.len().saturating_sub(1);
                }
            }
            Err(err) => self.notify_api_error("could not load tasks", err),
        }

        self.set_loading(false, "");
    }

    // ============ Edit modal ============

    /// Fetch the selected record and seed the modal draft from it, then
    /// request the assignee directory once for this modal.
    async fn open_edit(&mut self) {
        let Some(todo) = self.todos.get(self.selected_todo) else {
            return;
        };
        let id = todo.id;

        self.set_loading(true, "Loading task...");

        match self.api.fetch_todo(id).await {
            Ok(todo) => {
                self.edit = Some(EditDraft::seed(&todo));
                self.vim_mode = VimMode::Normal;
                self.load_users().await;
            }
            Err(err) => self.notify_api_error("could not load task", err),
        }

        self.set_loading(false, "");
    }

    /// Directory failures are soft: assignment becomes unavailable but the
    /// rest of the form stays usable. No retry.
    async fn load_users(&mut self) {
        match self.api.list_users().await {
            Ok(users) => self.users = users,
            Err(err) => {
                tracing::warn!(error = %err, "could not fetch assignable users");
                self.users.clear();
            }
        }
    }

    async fn handle_edit_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        let calendar_open = self
            .edit
            .as_ref()
            .is_some_and(|d| d.calendar.is_some());

        if self.vim_mode == VimMode::Normal && !calendar_open {
            match key.code {
                KeyCode::Esc => {
                    // Cancel always closes the modal, draft discarded
                    self.edit = None;
                    return Ok(false);
                }
                KeyCode::Char('s') => {
                    self.submit_edit().await;
                    return Ok(false);
                }
                _ => {}
            }
        }

        let Some(draft) = self.edit.as_mut() else {
            return Ok(false);
        };

        // The open calendar captures all input until a date is picked or
        // the picker is dismissed.
        if let Some(mut cal) = draft.calendar {
            match key.code {
                KeyCode::Esc => draft.close_calendar(),
                KeyCode::Enter => draft.set_date(cal.cursor),
                KeyCode::Char('h') | KeyCode::Left => {
                    cal.prev_day();
                    draft.calendar = Some(cal);
                }
                KeyCode::Char('l') | KeyCode::Right => {
                    cal.next_day();
                    draft.calendar = Some(cal);
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    cal.prev_week();
                    draft.calendar = Some(cal);
                }
                KeyCode::Char('p') | KeyCode::PageUp => {
                    cal.prev_month();
                    draft.calendar = Some(cal);
                }
                KeyCode::Char('n') | KeyCode::PageDown => {
                    cal.next_month();
                    draft.calendar = Some(cal);
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    cal.next_week();
                    draft.calendar = Some(cal);
                }
                _ => {}
            }
            return Ok(false);
        }

        match key.code {
            KeyCode::Esc if self.vim_mode == VimMode::Insert => {
                self.vim_mode = VimMode::Normal;
            }
            KeyCode::Tab => {
                self.vim_mode = VimMode::Normal;
                draft.field = draft.field.next();
            }
            KeyCode::BackTab => {
                self.vim_mode = VimMode::Normal;
                draft.field = draft.field.prev();
            }
            KeyCode::Char('i')
                if self.vim_mode == VimMode::Normal
                    && matches!(
                        draft.field,
                        EditField::Title | EditField::Label | EditField::Checklist
                    ) =>
            {
                self.vim_mode = VimMode::Insert;
            }
            _ if self.vim_mode == VimMode::Insert => match key.code {
                KeyCode::Char(c) => match draft.field {
                    EditField::Title => draft.title.push(c),
                    EditField::Label => draft.label.push(c),
                    EditField::Checklist => {
                        let idx = draft.item_cursor;
                        if let Some(item) = draft.tasks.get(idx) {
                            let mut title = item.title.clone();
                            title.push(c);
                            draft.set_item_title(idx, title);
                        }
                    }
                    _ => {}
                },
                KeyCode::Backspace => match draft.field {
                    EditField::Title => {
                        draft.title.pop();
                    }
                    EditField::Label => {
                        draft.label.pop();
                    }
                    EditField::Checklist => {
                        let idx = draft.item_cursor;
                        if let Some(item) = draft.tasks.get(idx) {
                            let mut title = item.title.clone();
                            title.pop();
                            draft.set_item_title(idx, title);
                        }
                    }
                    _ => {}
                },
                _ => {}
            },
            // Normal-mode, per-field keys
            KeyCode::Char('h') | KeyCode::Left if draft.field == EditField::Priority => {
                let p = cycle_priority(draft.priority, false);
                draft.set_priority(p);
            }
            KeyCode::Char('l') | KeyCode::Right if draft.field == EditField::Priority => {
                let p = cycle_priority(draft.priority, true);
                draft.set_priority(p);
            }
            KeyCode::Char('j') | KeyCode::Down if draft.field == EditField::Assignee => {
                if draft.assignee_cursor < self.users.len().saturating_sub(1) {
                    draft.assignee_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up if draft.field == EditField::Assignee => {
                if draft.assignee_cursor > 0 {
                    draft.assignee_cursor -= 1;
                }
            }
            KeyCode::Enter if draft.field == EditField::Assignee => {
                if let Some(user) = self.users.get(draft.assignee_cursor) {
                    draft.set_assigned_to(user.email.clone());
                }
            }
            KeyCode::Char('x') if draft.field == EditField::Assignee => {
                draft.set_assigned_to("");
            }
            KeyCode::Char('j') | KeyCode::Down if draft.field == EditField::Checklist => {
                if draft.item_cursor < draft.tasks.len().saturating_sub(1) {
                    draft.item_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up if draft.field == EditField::Checklist => {
                if draft.item_cursor > 0 {
                    draft.item_cursor -= 1;
                }
            }
            KeyCode::Char('a') if draft.field == EditField::Checklist => {
                draft.add_item();
                self.vim_mode = VimMode::Insert;
            }
            KeyCode::Char('d') if draft.field == EditField::Checklist => {
                let idx = draft.item_cursor;
                draft.remove_item(idx);
            }
            KeyCode::Char(' ') if draft.field == EditField::Checklist => {
                let idx = draft.item_cursor;
                draft.toggle_item(idx);
            }
            KeyCode::Enter if draft.field == EditField::DueDate => {
                draft.open_calendar(today());
            }
            _ => {}
        }

        Ok(false)
    }

    /// Validate and submit the draft. Validation failure aborts before any
    /// network call; an application error keeps the modal open with the
    /// draft untouched; success refreshes the cached list and closes it.
    pub async fn submit_edit(&mut self) {
        let Some(draft) = self.edit.as_ref() else {
            return;
        };
        if draft.pending {
            return;
        }

        let payload = match draft.validate() {
            Ok(p) => p,
            Err(msg) => {
                self.notify_error(msg);
                return;
            }
        };
        let id = draft.id;

        if let Some(d) = self.edit.as_mut() {
            d.pending = true;
        }
        self.set_loading(true, "Saving task...");

        let result = self.api.update_todo(id, payload).await;
        self.set_loading(false, "");

        match result {
            Ok(_) => {
                self.edit = None;
                self.load_todos().await;
            }
            Err(err) => {
                if let Some(d) = self.edit.as_mut() {
                    d.pending = false;
                }
                self.notify_api_error("task update failed", err);
            }
        }
    }

    // ============ Settings ============

    async fn handle_settings_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        let Some(draft) = self.settings.as_mut() else {
            self.view = View::TaskList;
            return Ok(false);
        };

        match key.code {
            KeyCode::Esc => {
                if self.vim_mode == VimMode::Insert {
                    self.vim_mode = VimMode::Normal;
                } else {
                    self.settings = None;
                    self.view = View::TaskList;
                }
            }
            KeyCode::Char('q') if self.vim_mode == VimMode::Normal => return Ok(true),
            KeyCode::Char('i') if self.vim_mode == VimMode::Normal => {
                self.vim_mode = VimMode::Insert;
            }
            KeyCode::Tab | KeyCode::Down => draft.field = draft.field.next(),
            KeyCode::BackTab | KeyCode::Up => draft.field = draft.field.prev(),
            KeyCode::Enter => self.submit_settings().await,
            KeyCode::Char(c) if self.vim_mode == VimMode::Insert => {
                draft.active_input().push(c);
            }
            KeyCode::Backspace if self.vim_mode == VimMode::Insert => {
                draft.active_input().pop();
            }
            _ => {}
        }

        Ok(false)
    }

    /// Submit the profile update. On success the stored credentials are
    /// replaced with the server payload and the view redirects to Login:
    /// the update invalidates the current session.
    pub async fn submit_settings(&mut self) {
        let Some(draft) = self.settings.as_ref() else {
            return;
        };
        if draft.pending {
            return;
        }
        let payload = draft.payload();

        if let Some(d) = self.settings.as_mut() {
            d.pending = true;
        }
        self.set_loading(true, "Updating profile...");

        let result = self.api.update_profile(payload).await;
        self.set_loading(false, "");

        match result {
            Ok(creds) => {
                if let Err(e) = self.session.replace(creds) {
                    tracing::warn!(error = %e, "could not persist session");
                }
                self.api.set_token(None);
                self.settings = None;
                self.login_password.clear();
                self.vim_mode = VimMode::Normal;
                self.notify_success("Profile updated successfully");
                self.view = View::Login;
            }
            Err(err) => {
                if let Some(d) = self.settings.as_mut() {
                    d.pending = false;
                }
                self.notify_api_error("profile update failed", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemorySession;
    use taskboard_shared::{
        ChecklistItem, Credentials, UpdateProfileRequest, UpdateTodoRequest,
    };
    use uuid::Uuid;

    /// Recording fake backend. Errors are modeled as the application-level
    /// messages the server would report.
    #[derive(Default)]
    struct FakeApi {
        todos: Vec<Todo>,
        users: Vec<UserRef>,
        users_fail: bool,
        update_error: Option<String>,
        profile_result: Option<Credentials>,
        profile_error: Option<String>,
        login_result: Option<Credentials>,

        update_calls: Vec<(Uuid, UpdateTodoRequest)>,
        profile_calls: Vec<UpdateProfileRequest>,
        list_calls: usize,
        user_list_calls: usize,
    }

    impl Api for FakeApi {
        async fn fetch_todo(&mut self, id: Uuid) -> Result<Todo, ApiError> {
            self.todos
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or(ApiError::NotFound)
        }

        async fn list_todos(&mut self) -> Result<Vec<Todo>, ApiError> {
            self.list_calls += 1;
            Ok(self.todos.clone())
        }

        async fn update_todo(
            &mut self,
            id: Uuid,
            req: UpdateTodoRequest,
        ) -> Result<Todo, ApiError> {
            self.update_calls.push((id, req.clone()));
            if let Some(msg) = &self.update_error {
                return Err(ApiError::Application(msg.clone()));
            }
            let todo = self
                .todos
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or(ApiError::NotFound)?;
            Ok(Todo {
                title: req.title,
                date: req.date,
                priority: Some(req.priority),
                tasks: req.tasks,
                label: req.label,
                assigned_to: req.assigned_to,
                ..todo
            })
        }

        async fn list_users(&mut self) -> Result<Vec<UserRef>, ApiError> {
            self.user_list_calls += 1;
            if self.users_fail {
                return Err(ApiError::Server("503: unavailable".into()));
            }
            Ok(self.users.clone())
        }

        async fn login(&mut self, _req: LoginRequest) -> Result<Credentials, ApiError> {
            self.login_result
                .clone()
                .ok_or_else(|| ApiError::Application("Invalid email or password".into()))
        }

        async fn update_profile(
            &mut self,
            req: UpdateProfileRequest,
        ) -> Result<Credentials, ApiError> {
            self.profile_calls.push(req);
            if let Some(msg) = &self.profile_error {
                return Err(ApiError::Application(msg.clone()));
            }
            self.profile_result
                .clone()
                .ok_or_else(|| ApiError::Application("Wrong password".into()))
        }

        fn set_token(&mut self, _token: Option<String>) {}
    }

    fn item(title: &str, completed: bool) -> ChecklistItem {
        ChecklistItem {
            title: title.to_string(),
            completed,
        }
    }

    fn sample_todo() -> Todo {
        Todo {
            id: Uuid::new_v4(),
            title: "Release checklist".into(),
            date: None,
            priority: Some(Priority::Moderate),
            tasks: vec![item("A", true), item("", false), item("B", false)],
            label: "release".into(),
            assigned_to: String::new(),
        }
    }

    fn creds(name: &str) -> Credentials {
        Credentials {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            token: format!("token-{}", name),
        }
    }

    fn app_with(api: FakeApi) -> App<FakeApi, MemorySession> {
        App::new(api, MemorySession(Some(creds("Riya"))))
    }

    fn app_editing(api: FakeApi, todo: &Todo) -> App<FakeApi, MemorySession> {
        let mut app = app_with(api);
        app.edit = Some(EditDraft::seed(todo));
        app
    }

    #[tokio::test]
    async fn submit_with_all_empty_checklist_never_calls_update() {
        let mut todo = sample_todo();
        todo.tasks = vec![item("", false), item("", true)];
        let mut app = app_editing(FakeApi::default(), &todo);

        app.submit_edit().await;

        assert!(app.api.update_calls.is_empty());
        assert!(app.edit.is_some());
        assert_eq!(
            app.notice.as_ref().map(|n| n.level),
            Some(NoticeLevel::Error)
        );
    }

    #[tokio::test]
    async fn submit_without_priority_never_calls_update() {
        let mut todo = sample_todo();
        todo.priority = None;
        let mut app = app_editing(FakeApi::default(), &todo);

        app.submit_edit().await;

        assert!(app.api.update_calls.is_empty());
        assert!(app.edit.is_some());
    }

    #[tokio::test]
    async fn successful_submit_strips_empty_items_refreshes_and_closes() {
        let todo = sample_todo();
        let api = FakeApi {
            todos: vec![todo.clone()],
            ..Default::default()
        };
        let mut app = app_editing(api, &todo);

        app.submit_edit().await;

        assert_eq!(app.api.update_calls.len(), 1);
        let (id, payload) = &app.api.update_calls[0];
        assert_eq!(*id, todo.id);
        assert_eq!(payload.tasks, vec![item("A", true), item("B", false)]);

        assert!(app.edit.is_none());
        assert_eq!(app.api.list_calls, 1);
        assert_eq!(app.todos.len(), 1);
    }

    #[tokio::test]
    async fn server_error_keeps_modal_open_and_draft_unchanged() {
        let todo = sample_todo();
        let api = FakeApi {
            todos: vec![todo.clone()],
            update_error: Some("Task not yours".into()),
            ..Default::default()
        };
        let mut app = app_editing(api, &todo);
        app.edit.as_mut().unwrap().set_title("Edited title");

        app.submit_edit().await;

        let draft = app.edit.as_ref().expect("modal must stay open");
        assert_eq!(draft.title, "Edited title");
        assert_eq!(draft.tasks, todo.tasks);
        assert!(!draft.pending);
        assert_eq!(
            app.notice,
            Some(Notice {
                level: NoticeLevel::Error,
                text: "Task not yours".into(),
            })
        );
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_ignored() {
        let todo = sample_todo();
        let mut app = app_editing(FakeApi::default(), &todo);
        app.edit.as_mut().unwrap().pending = true;

        app.submit_edit().await;

        assert!(app.api.update_calls.is_empty());
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn opening_edit_requests_directory_once_and_fails_soft() {
        let todo = sample_todo();
        let api = FakeApi {
            todos: vec![todo.clone()],
            users_fail: true,
            ..Default::default()
        };
        let mut app = app_with(api);
        app.todos = vec![todo];

        app.open_edit().await;

        assert!(app.edit.is_some(), "form stays usable");
        assert!(app.users.is_empty());
        assert_eq!(app.api.user_list_calls, 1);
        assert!(app.notice.is_none(), "directory failure is only logged");
    }

    #[tokio::test]
    async fn opening_edit_populates_assignable_users() {
        let todo = sample_todo();
        let api = FakeApi {
            todos: vec![todo.clone()],
            users: vec![
                UserRef {
                    email: "a@example.com".into(),
                },
                UserRef {
                    email: "b@example.com".into(),
                },
            ],
            ..Default::default()
        };
        let mut app = app_with(api);
        app.todos = vec![todo.clone()];

        app.open_edit().await;

        assert_eq!(app.users.len(), 2);
        let draft = app.edit.as_ref().unwrap();
        assert_eq!(draft.tasks, todo.tasks);
    }

    #[tokio::test]
    async fn profile_update_replaces_credentials_and_redirects_to_login() {
        let new_creds = creds("Renamed");
        let api = FakeApi {
            profile_result: Some(new_creds.clone()),
            ..Default::default()
        };
        let mut app = app_with(api);
        app.view = View::Settings;
        app.settings = Some(SettingsDraft::seed(app.session.current()));

        app.submit_settings().await;

        assert_eq!(app.session.current(), Some(&new_creds));
        assert_eq!(app.view, View::Login);
        assert!(app.settings.is_none());
        assert_eq!(
            app.notice.as_ref().map(|n| n.level),
            Some(NoticeLevel::Success)
        );
        assert_eq!(app.api.profile_calls.len(), 1);
    }

    #[tokio::test]
    async fn profile_error_shows_message_and_changes_nothing_else() {
        let api = FakeApi {
            profile_error: Some("Incorrect old password".into()),
            ..Default::default()
        };
        let mut app = app_with(api);
        let original = app.session.current().cloned();
        app.view = View::Settings;
        app.settings = Some(SettingsDraft::seed(app.session.current()));

        app.submit_settings().await;

        assert_eq!(app.session.current(), original.as_ref());
        assert_eq!(app.view, View::Settings);
        let draft = app.settings.as_ref().expect("form stays open");
        assert!(!draft.pending);
        assert_eq!(
            app.notice,
            Some(Notice {
                level: NoticeLevel::Error,
                text: "Incorrect old password".into(),
            })
        );
    }

    #[tokio::test]
    async fn pending_settings_submit_is_single_flight() {
        let api = FakeApi {
            profile_result: Some(creds("Renamed")),
            ..Default::default()
        };
        let mut app = app_with(api);
        app.settings = Some(SettingsDraft::seed(app.session.current()));
        app.settings.as_mut().unwrap().pending = true;

        app.submit_settings().await;

        assert!(app.api.profile_calls.is_empty());
    }

    #[tokio::test]
    async fn login_stores_credentials_and_loads_tasks() {
        let todo = sample_todo();
        let api = FakeApi {
            todos: vec![todo],
            login_result: Some(creds("Riya")),
            ..Default::default()
        };
        let mut app = App::new(api, MemorySession(None));
        assert_eq!(app.view, View::Login);
        app.login_email = "riya@example.com".into();
        app.login_password = "secret".into();

        app.do_login().await;

        assert_eq!(app.session.current(), Some(&creds("Riya")));
        assert_eq!(app.view, View::TaskList);
        assert_eq!(app.todos.len(), 1);
        assert!(app.login_password.is_empty());
    }

    #[tokio::test]
    async fn failed_login_stays_on_login_view() {
        let mut app = App::new(FakeApi::default(), MemorySession(None));
        app.login_email = "riya@example.com".into();
        app.login_password = "wrong".into();

        app.do_login().await;

        assert_eq!(app.view, View::Login);
        assert!(app.session.current().is_none());
        assert_eq!(
            app.notice,
            Some(Notice {
                level: NoticeLevel::Error,
                text: "Invalid email or password".into(),
            })
        );
    }

    #[test]
    fn priority_cycling_wraps_both_ways() {
        assert_eq!(cycle_priority(None, true), Priority::High);
        assert_eq!(cycle_priority(Some(Priority::Low), true), Priority::High);
        assert_eq!(cycle_priority(Some(Priority::High), false), Priority::Low);
    }
}
