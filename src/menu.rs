//! # Menu Catalog
//!
//! Static definitions of the main reply keyboard, the three inline sub-menus
//! and the callback vocabulary their buttons emit. Nothing here holds state.

/// Reply keyboard labels, in display order
pub const EVENTS_LABEL: &str = "📅 Мероприятия";
pub const SERVICES_LABEL: &str = "📦 Торговля/услуги";
pub const ATTRACTIONS_LABEL: &str = "🎡 Развлечения";
pub const SITE_SEARCH_LABEL: &str = "🔍 Поиск";
pub const GROUP_SEARCH_LABEL: &str = "🔍 Поиск в группе Telegram";

pub const START_COMMAND: &str = "/start";

pub const MAIN_MENU_LABELS: [&str; 5] = [
    EVENTS_LABEL,
    SERVICES_LABEL,
    ATTRACTIONS_LABEL,
    SITE_SEARCH_LABEL,
    GROUP_SEARCH_LABEL,
];

const EVENTS_PLAN_URL: &str = "https://disk.yandex.ru/i/UwUr6rxRKLJfGw";
const PHOTO_REPORTS_URL: &str = "https://vk.com/albums-190907367";

pub const NEXT_LABEL: &str = "➡️ Следующая";
pub const BACK_TO_MENU_LABEL: &str = "🔙 В меню";
const BACK_LABEL: &str = "🔙 Назад";

/// Callback identifiers carried by inline buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackAction {
    PriceList,
    ApplicationForm,
    AttractionList,
    Back,
    NextArticle,
    NextGroupArticle,
}

impl CallbackAction {
    pub const ALL: [CallbackAction; 6] = [
        CallbackAction::PriceList,
        CallbackAction::ApplicationForm,
        CallbackAction::AttractionList,
        CallbackAction::Back,
        CallbackAction::NextArticle,
        CallbackAction::NextGroupArticle,
    ];

    /// Wire form of the identifier, as sent in callback data
    pub fn as_str(self) -> &'static str {
        match self {
            CallbackAction::PriceList => "price_list",
            CallbackAction::ApplicationForm => "application_form",
            CallbackAction::AttractionList => "attr_list",
            CallbackAction::Back => "back",
            CallbackAction::NextArticle => "next_article",
            CallbackAction::NextGroupArticle => "next_group_article",
        }
    }

    /// Parse callback data; unknown identifiers yield `None`
    pub fn parse(data: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == data)
    }
}

/// What pressing an inline button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Opens an external link in the client
    OpenUrl(&'static str),
    /// Sends a callback back to the bot
    Callback(CallbackAction),
}

/// A single inline button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub action: MenuAction,
}

impl MenuEntry {
    pub const fn callback(label: &'static str, action: CallbackAction) -> Self {
        Self {
            label,
            action: MenuAction::Callback(action),
        }
    }

    pub const fn url(label: &'static str, url: &'static str) -> Self {
        Self {
            label,
            action: MenuAction::OpenUrl(url),
        }
    }
}

/// Rows of inline buttons attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<MenuEntry>>,
}

impl InlineKeyboard {
    /// One button per row, in the given order
    pub fn single_column(entries: &[MenuEntry]) -> Self {
        Self {
            rows: entries.iter().map(|entry| vec![*entry]).collect(),
        }
    }

    /// All buttons on one row
    pub fn single_row(entries: &[MenuEntry]) -> Self {
        Self {
            rows: vec![entries.to_vec()],
        }
    }

    /// Every button, row by row
    pub fn entries(&self) -> impl Iterator<Item = &MenuEntry> {
        self.rows.iter().flatten()
    }
}

/// Keyboards the bot can attach to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Persistent keyboard replacing the client's text input
    Reply(Vec<Vec<&'static str>>),
    /// Buttons attached under the message itself
    Inline(InlineKeyboard),
}

/// The main reply keyboard shown on `/start` and whenever the user goes back
pub fn main_menu() -> Keyboard {
    Keyboard::Reply(MAIN_MENU_LABELS.iter().map(|label| vec![*label]).collect())
}

static EVENTS_ENTRIES: [MenuEntry; 3] = [
    MenuEntry::url("📆 План мероприятий", EVENTS_PLAN_URL),
    MenuEntry::url("📸 Фотоотчеты", PHOTO_REPORTS_URL),
    MenuEntry::callback(BACK_LABEL, CallbackAction::Back),
];

static SERVICES_ENTRIES: [MenuEntry; 3] = [
    MenuEntry::callback("📋 Прайс-лист", CallbackAction::PriceList),
    MenuEntry::callback("📄 Заявка (НТО)", CallbackAction::ApplicationForm),
    MenuEntry::callback(BACK_LABEL, CallbackAction::Back),
];

static ATTRACTIONS_ENTRIES: [MenuEntry; 2] = [
    MenuEntry::callback("💰 Стоимость", CallbackAction::AttractionList),
    MenuEntry::callback(BACK_LABEL, CallbackAction::Back),
];

/// The inline sub-menus reachable from the main keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    Events,
    Services,
    Attractions,
}

impl Menu {
    /// Ordered buttons of the sub-menu
    pub fn entries(self) -> &'static [MenuEntry] {
        match self {
            Menu::Events => &EVENTS_ENTRIES,
            Menu::Services => &SERVICES_ENTRIES,
            Menu::Attractions => &ATTRACTIONS_ENTRIES,
        }
    }

    /// Localization key of the caption sent before the sub-menu
    pub fn caption_key(self) -> &'static str {
        match self {
            Menu::Events => "events-chosen",
            Menu::Services => "services-chosen",
            Menu::Attractions => "attractions-chosen",
        }
    }

    pub fn keyboard(self) -> InlineKeyboard {
        InlineKeyboard::single_column(self.entries())
    }
}

/// Text inputs the bot reacts to while no search is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevelInput {
    Start,
    Open(Menu),
    SiteSearch,
    GroupSearch,
}

impl TopLevelInput {
    /// Match the literal text of a message against the known labels
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            START_COMMAND => Some(TopLevelInput::Start),
            EVENTS_LABEL => Some(TopLevelInput::Open(Menu::Events)),
            SERVICES_LABEL => Some(TopLevelInput::Open(Menu::Services)),
            ATTRACTIONS_LABEL => Some(TopLevelInput::Open(Menu::Attractions)),
            SITE_SEARCH_LABEL => Some(TopLevelInput::SiteSearch),
            GROUP_SEARCH_LABEL => Some(TopLevelInput::GroupSearch),
            _ => None,
        }
    }
}
