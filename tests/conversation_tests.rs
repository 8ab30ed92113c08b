//! # Conversation Tests
//!
//! Drives the conversation state machine through a recording transport and
//! scripted search backends, checking the outbound actions and the stored
//! per-chat state.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use teloxide::dispatching::dialogue::Storage;
use teloxide::types::{ChatId, MessageId};
use tempfile::TempDir;

use parkbot::bot::ui_builder::{create_exhausted_keyboard, create_result_keyboard};
use parkbot::bot::Conversation;
use parkbot::config::ContentPaths;
use parkbot::dialogue::{ChatMode, ChatState, ChatStateStore, InMemChatStore};
use parkbot::errors::{SearchError, TransportError};
use parkbot::menu::{main_menu, InlineKeyboard, Keyboard, Menu};
use parkbot::search::{SearchKind, Searcher};
use parkbot::transport::ChatTransport;

const CHAT: ChatId = ChatId(42);

#[derive(Debug, Clone, PartialEq)]
enum Action {
    Text {
        text: String,
        keyboard: Option<Keyboard>,
    },
    Edit {
        message_id: MessageId,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Delete(MessageId),
    Document(PathBuf),
    Album(Vec<PathBuf>),
}

#[derive(Default)]
struct RecordingTransport {
    actions: Mutex<Vec<Action>>,
    next_id: AtomicI32,
    fail_album: bool,
    /// Images delivered before the album request fails
    album_delivered_before_failure: Option<usize>,
    fail_delete: bool,
}

impl RecordingTransport {
    fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.actions.lock().unwrap().clear();
    }

    fn record(&self, action: Action) {
        self.actions.lock().unwrap().push(action);
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(
        &self,
        _chat_id: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageId, TransportError> {
        self.record(Action::Text {
            text: text.to_string(),
            keyboard,
        });
        Ok(MessageId(100 + self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn edit_text(
        &self,
        _chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<(), TransportError> {
        self.record(Action::Edit {
            message_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn delete_message(
        &self,
        _chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TransportError> {
        if self.fail_delete {
            return Err(TransportError::Api("message can't be deleted".to_string()));
        }
        self.record(Action::Delete(message_id));
        Ok(())
    }

    async fn send_document(
        &self,
        _chat_id: ChatId,
        path: &Path,
        _caption: Option<&str>,
    ) -> Result<(), TransportError> {
        self.record(Action::Document(path.to_path_buf()));
        Ok(())
    }

    async fn send_album(&self, _chat_id: ChatId, images: &[PathBuf]) -> Result<(), TransportError> {
        if self.fail_album {
            return Err(TransportError::Api("Bad Request: wrong file".to_string()));
        }
        if let Some(delivered) = self.album_delivered_before_failure {
            self.record(Action::Album(images[..delivered].to_vec()));
            return Err(TransportError::AlbumInterrupted {
                delivered,
                total: images.len(),
                message: "Telegram API error: timeout".to_string(),
            });
        }
        self.record(Action::Album(images.to_vec()));
        Ok(())
    }
}

/// Search backend returning a fixed answer and remembering its keywords
struct ScriptedSearch {
    links: Option<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSearch {
    fn returning(links: &[&str]) -> Self {
        Self {
            links: Some(links.iter().map(|l| l.to_string()).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            links: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Searcher for ScriptedSearch {
    async fn search(&self, keyword: &str) -> Result<Vec<String>, SearchError> {
        self.calls.lock().unwrap().push(keyword.to_string());
        self.links
            .clone()
            .ok_or_else(|| SearchError::Network("connection refused".to_string()))
    }
}

struct Harness {
    conversation: Conversation,
    transport: Arc<RecordingTransport>,
    store: Arc<InMemChatStore>,
    site: Arc<ScriptedSearch>,
    group: Arc<ScriptedSearch>,
    content: ContentPaths,
    _files: TempDir,
}

impl Harness {
    /// Raw entry in the dialogue storage; `None` for chats in the default state
    async fn stored(&self, chat_id: ChatId) -> Option<ChatState> {
        self.store.storage().get_dialogue(chat_id).await.unwrap()
    }
}

fn content_dir(with_form: bool) -> (TempDir, ContentPaths) {
    let files = tempfile::tempdir().unwrap();
    let content = ContentPaths::under(files.path());

    fs::create_dir_all(&content.sales_photos).unwrap();
    fs::create_dir_all(&content.attraction_photos).unwrap();
    fs::write(content.sales_photos.join("b.jpg"), b"jpeg").unwrap();
    fs::write(content.sales_photos.join("a.jpg"), b"jpeg").unwrap();
    fs::write(content.sales_photos.join("readme.txt"), b"text").unwrap();
    if with_form {
        fs::write(&content.application_form, b"doc").unwrap();
    }

    (files, content)
}

fn harness_with(
    transport: RecordingTransport,
    site: ScriptedSearch,
    group: ScriptedSearch,
    with_form: bool,
) -> Harness {
    let (files, content) = content_dir(with_form);
    let transport = Arc::new(transport);
    let store = Arc::new(InMemChatStore::new());
    let site = Arc::new(site);
    let group = Arc::new(group);

    let conversation = Conversation::new(
        transport.clone(),
        store.clone(),
        site.clone(),
        group.clone(),
        content.clone(),
    );

    Harness {
        conversation,
        transport,
        store,
        site,
        group,
        content,
        _files: files,
    }
}

fn harness(site: ScriptedSearch) -> Harness {
    harness_with(
        RecordingTransport::default(),
        site,
        ScriptedSearch::returning(&[]),
        true,
    )
}

fn text(text: &str, keyboard: Option<Keyboard>) -> Action {
    Action::Text {
        text: text.to_string(),
        keyboard,
    }
}

fn main_menu_prompt() -> Action {
    text("Выберите раздел:", Some(main_menu()))
}

impl Harness {
    async fn say(&self, message: &str) {
        self.conversation.on_text_message(CHAT, message).await.unwrap();
    }

    async fn press(&self, message_id: i32, data: &str) {
        self.conversation
            .on_callback(CHAT, MessageId(message_id), data)
            .await
            .unwrap();
    }

    /// Start a site search and return the id of the results message
    async fn site_search(&self, keyword: &str) -> i32 {
        self.say("🔍 Поиск").await;
        self.say(keyword).await;
        // prompt, placeholder, results
        102
    }
}

#[tokio::test]
async fn test_start_shows_greeting_and_main_keyboard() {
    let h = harness(ScriptedSearch::returning(&[]));
    h.say("/start").await;

    let actions = h.transport.actions();
    assert_eq!(
        actions,
        vec![text("Здравствуйте!\nВыберете раздел:", Some(main_menu()))]
    );

    let Action::Text {
        keyboard: Some(Keyboard::Reply(rows)),
        ..
    } = &actions[0]
    else {
        panic!("expected a reply keyboard");
    };
    let labels: Vec<&str> = rows.iter().flatten().copied().collect();
    assert_eq!(
        labels,
        vec![
            "📅 Мероприятия",
            "📦 Торговля/услуги",
            "🎡 Развлечения",
            "🔍 Поиск",
            "🔍 Поиск в группе Telegram",
        ]
    );
}

#[tokio::test]
async fn test_menu_label_shows_caption_then_submenu() {
    let h = harness(ScriptedSearch::returning(&[]));
    h.say("📦 Торговля/услуги").await;

    assert_eq!(
        h.transport.actions(),
        vec![
            text("Вы выбрали: Торговля/услуги", None),
            text(
                "Выберите категорию:",
                Some(Keyboard::Inline(Menu::Services.keyboard()))
            ),
        ]
    );
}

#[tokio::test]
async fn test_unrecognized_text_is_ignored() {
    let h = harness(ScriptedSearch::returning(&["https://a"]));
    h.say("hello there").await;

    assert!(h.transport.actions().is_empty());
    assert!(h.site.calls().is_empty());
    assert_eq!(h.stored(CHAT).await, None);
}

#[tokio::test]
async fn test_site_search_shows_first_result() {
    let h = harness(ScriptedSearch::returning(&["https://a", "https://b"]));
    h.say("🔍 Поиск").await;
    assert_eq!(
        h.store.get(CHAT).await.mode,
        ChatMode::AwaitingSiteSearchQuery
    );

    h.say("test").await;

    assert_eq!(h.site.calls(), vec!["test".to_string()]);
    assert!(h.group.calls().is_empty());
    assert_eq!(
        h.transport.actions(),
        vec![
            text("Введите ключевое слово для поиска:", None),
            text("🔍 Ищу по запросу: test...", None),
            Action::Delete(MessageId(101)),
            text(
                "1/2\nhttps://a",
                Some(Keyboard::Inline(create_result_keyboard(SearchKind::Site)))
            ),
        ]
    );

    let state = h.store.get(CHAT).await;
    assert_eq!(state.mode, ChatMode::Idle);
    let session = state.session.unwrap();
    assert_eq!(session.cursor(), 0);
    assert_eq!(session.len(), 2);
}

#[tokio::test]
async fn test_mode_is_consumed_by_exactly_one_search() {
    let h = harness(ScriptedSearch::returning(&["https://a"]));
    h.say("🔍 Поиск").await;
    h.say("first").await;
    h.say("second").await;

    assert_eq!(h.site.calls(), vec!["first".to_string()]);
    assert_eq!(h.store.get(CHAT).await.mode, ChatMode::Idle);
}

#[tokio::test]
async fn test_failed_search_reports_nothing_found_and_drops_session() {
    let h = harness(ScriptedSearch::failing());
    let mut state = h.store.get(CHAT).await;
    state.session = parkbot::dialogue::SearchSession::new(
        SearchKind::Site,
        vec!["https://old".to_string()],
    );
    h.store.put(CHAT, state).await;

    h.say("🔍 Поиск").await;
    h.say("test").await;

    let actions = h.transport.actions();
    assert_eq!(actions.last(), Some(&text("Ничего не найдено.", None)));
    assert_eq!(h.site.calls().len(), 1);

    let state = h.store.get(CHAT).await;
    assert_eq!(state.mode, ChatMode::Idle);
    assert!(state.session.is_none());
}

#[tokio::test]
async fn test_empty_search_reports_nothing_found() {
    let h = harness(ScriptedSearch::returning(&[]));
    h.say("🔍 Поиск").await;
    h.say("test").await;

    assert_eq!(
        h.transport.actions().last(),
        Some(&text("Ничего не найдено.", None))
    );
    assert_eq!(h.stored(CHAT).await, None);
}

#[tokio::test]
async fn test_next_pages_then_exhausts() {
    let h = harness(ScriptedSearch::returning(&["https://a", "https://b"]));
    let results_message = h.site_search("test").await;
    h.transport.clear();

    h.press(results_message, "next_article").await;
    h.press(results_message, "next_article").await;

    assert_eq!(
        h.transport.actions(),
        vec![
            Action::Edit {
                message_id: MessageId(results_message),
                text: "2/2\nhttps://b".to_string(),
                keyboard: Some(create_result_keyboard(SearchKind::Site)),
            },
            Action::Edit {
                message_id: MessageId(results_message),
                text: "Больше нет статей. 🔙 В меню".to_string(),
                keyboard: Some(create_exhausted_keyboard()),
            },
        ]
    );
    assert!(h.store.get(CHAT).await.session.is_none());
}

#[tokio::test]
async fn test_n_minus_one_presses_reach_last_result() {
    for n in 1..=5 {
        let links: Vec<String> = (0..n).map(|i| format!("https://r/{i}")).collect();
        let refs: Vec<&str> = links.iter().map(String::as_str).collect();
        let h = harness(ScriptedSearch::returning(&refs));
        let results_message = h.site_search("park").await;

        for _ in 0..n - 1 {
            h.press(results_message, "next_article").await;
        }
        let session = h.store.get(CHAT).await.session.unwrap();
        assert_eq!(session.cursor(), n - 1);
        assert_eq!(session.current(), format!("https://r/{}", n - 1));

        h.transport.clear();
        h.press(results_message, "next_article").await;
        let Some(Action::Edit { text, keyboard, .. }) = h.transport.actions().pop() else {
            panic!("expected an edit");
        };
        assert_eq!(text, "Больше нет статей. 🔙 В меню");
        assert_eq!(keyboard, Some(create_exhausted_keyboard()));
    }
}

#[tokio::test]
async fn test_next_without_session_shows_no_more_articles() {
    let h = harness(ScriptedSearch::returning(&[]));
    h.press(77, "next_article").await;

    assert_eq!(
        h.transport.actions(),
        vec![Action::Edit {
            message_id: MessageId(77),
            text: "Больше нет статей. 🔙 В меню".to_string(),
            keyboard: Some(create_exhausted_keyboard()),
        }]
    );
    assert_eq!(h.stored(CHAT).await, None);
}

#[tokio::test]
async fn test_group_search_uses_group_backend_and_tag() {
    let h = harness_with(
        RecordingTransport::default(),
        ScriptedSearch::returning(&["https://site"]),
        ScriptedSearch::returning(&["https://t.me/park/3", "https://t.me/park/1"]),
        true,
    );
    h.say("🔍 Поиск в группе Telegram").await;
    h.say("ярмарка").await;

    assert!(h.site.calls().is_empty());
    assert_eq!(h.group.calls(), vec!["ярмарка".to_string()]);
    assert_eq!(
        h.transport.actions().last(),
        Some(&text(
            "1/2\nhttps://t.me/park/3",
            Some(Keyboard::Inline(create_result_keyboard(SearchKind::Group)))
        ))
    );

    // A site "next" does not page a group session
    h.transport.clear();
    h.press(102, "next_article").await;
    assert!(matches!(
        h.transport.actions().as_slice(),
        [Action::Edit { text, .. }] if text == "Больше нет статей. 🔙 В меню"
    ));
    assert_eq!(h.store.get(CHAT).await.session.unwrap().cursor(), 0);

    h.transport.clear();
    h.press(102, "next_group_article").await;
    assert_eq!(
        h.transport.actions(),
        vec![Action::Edit {
            message_id: MessageId(102),
            text: "2/2\nhttps://t.me/park/1".to_string(),
            keyboard: Some(create_result_keyboard(SearchKind::Group)),
        }]
    );
}

#[tokio::test]
async fn test_price_list_sends_sorted_album_then_menu() {
    let h = harness(ScriptedSearch::returning(&[]));
    h.press(5, "price_list").await;

    assert_eq!(
        h.transport.actions(),
        vec![
            Action::Album(vec![
                h.content.sales_photos.join("a.jpg"),
                h.content.sales_photos.join("b.jpg"),
            ]),
            main_menu_prompt(),
        ]
    );
}

#[tokio::test]
async fn test_empty_album_directory_yields_single_failure_notice() {
    let h = harness(ScriptedSearch::returning(&[]));
    h.press(5, "attr_list").await;

    assert_eq!(
        h.transport.actions(),
        vec![text("Не удалось получить документы.", None)]
    );
}

#[tokio::test]
async fn test_missing_album_directory_yields_single_failure_notice() {
    let h = harness(ScriptedSearch::returning(&[]));
    fs::remove_dir_all(&h.content.sales_photos).unwrap();
    h.press(5, "price_list").await;

    assert_eq!(
        h.transport.actions(),
        vec![text("Не удалось получить документы.", None)]
    );
}

#[tokio::test]
async fn test_album_send_failure_is_reported_without_menu() {
    let h = harness_with(
        RecordingTransport {
            fail_album: true,
            ..Default::default()
        },
        ScriptedSearch::returning(&[]),
        ScriptedSearch::returning(&[]),
        true,
    );
    h.press(5, "price_list").await;

    assert_eq!(
        h.transport.actions(),
        vec![text("Не получилось отправить фото", None)]
    );
}

#[tokio::test]
async fn test_partially_sent_album_is_reported_without_menu() {
    let h = harness_with(
        RecordingTransport {
            album_delivered_before_failure: Some(1),
            ..Default::default()
        },
        ScriptedSearch::returning(&[]),
        ScriptedSearch::returning(&[]),
        true,
    );
    h.press(5, "price_list").await;

    assert_eq!(
        h.transport.actions(),
        vec![
            Action::Album(vec![h.content.sales_photos.join("a.jpg")]),
            text("Не получилось отправить фото", None),
        ]
    );
}

#[tokio::test]
async fn test_application_form_sends_document_caption_and_menu() {
    let h = harness(ScriptedSearch::returning(&[]));
    h.press(5, "application_form").await;

    let actions = h.transport.actions();
    assert_eq!(actions.len(), 3);
    assert_eq!(
        actions[0],
        Action::Document(h.content.application_form.clone())
    );
    assert!(matches!(
        &actions[1],
        Action::Text { text, keyboard: None } if text.contains("info@parkinnov.ru")
    ));
    assert_eq!(actions[2], main_menu_prompt());
}

#[tokio::test]
async fn test_missing_application_form_is_reported() {
    let h = harness_with(
        RecordingTransport::default(),
        ScriptedSearch::returning(&[]),
        ScriptedSearch::returning(&[]),
        false,
    );
    h.press(5, "application_form").await;

    assert_eq!(
        h.transport.actions(),
        vec![text("Не удалось получить документы.", None)]
    );
}

#[tokio::test]
async fn test_back_deletes_menu_message_and_keeps_session() {
    let h = harness(ScriptedSearch::returning(&["https://a", "https://b"]));
    let results_message = h.site_search("test").await;
    h.transport.clear();

    h.press(results_message, "back").await;

    assert_eq!(
        h.transport.actions(),
        vec![Action::Delete(MessageId(results_message)), main_menu_prompt()]
    );
    assert!(h.store.get(CHAT).await.session.is_some());
}

#[tokio::test]
async fn test_back_survives_delete_failure() {
    let h = harness_with(
        RecordingTransport {
            fail_delete: true,
            ..Default::default()
        },
        ScriptedSearch::returning(&[]),
        ScriptedSearch::returning(&[]),
        true,
    );
    h.press(9, "back").await;

    assert_eq!(h.transport.actions(), vec![main_menu_prompt()]);
}

#[tokio::test]
async fn test_unknown_callback_does_nothing() {
    let h = harness(ScriptedSearch::returning(&[]));
    h.press(9, "edit_0").await;

    assert!(h.transport.actions().is_empty());
}

#[tokio::test]
async fn test_chats_are_independent() {
    let h = harness(ScriptedSearch::returning(&["https://a"]));
    h.say("🔍 Поиск").await;
    h.conversation
        .on_text_message(ChatId(43), "test")
        .await
        .unwrap();

    assert!(h.site.calls().is_empty());
    assert_eq!(
        h.store.get(CHAT).await.mode,
        ChatMode::AwaitingSiteSearchQuery
    );
    assert_eq!(h.store.get(ChatId(43)).await.mode, ChatMode::Idle);
}
