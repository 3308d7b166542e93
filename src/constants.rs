//! Application constants for the goals dashboard
//!
//! Column vocabulary of the upstream spreadsheet, identity defaults,
//! per-sheet queue catalogs and the default goal values.

// =============================================================================
// Required Sheets
// =============================================================================

/// Support sheet (technical support team)
pub const SHEET_SUPPORT: &str = "Suporte";

/// Customer service sheet
pub const SHEET_CUSTOMER_SERVICE: &str = "SAC";

// =============================================================================
// Identity Columns
// =============================================================================

/// Name column candidates, in priority order
pub const NAME_CANDIDATES: &[&str] = &[
    "nome",
    "colaborador",
    "atendente",
    "name",
    "collaborator",
    "agent",
];

/// Team column candidates, in priority order
pub const TEAM_CANDIDATES: &[&str] = &["equipe", "time", "squad", "team", "unit"];

/// Shift column candidates, in priority order
pub const SHIFT_CANDIDATES: &[&str] = &[
    "horario", "horário", "turno", "escala", "shift", "schedule",
];

/// Legacy header-less layout: name in column A, team in D, shift in E
pub const NAME_POSITION: usize = 0;
pub const TEAM_POSITION: usize = 3;
pub const SHIFT_POSITION: usize = 4;

pub const DEFAULT_NAME: &str = "N/A";
pub const DEFAULT_TEAM: &str = "Geral";
pub const DEFAULT_SHIFT: &str = "-";

// =============================================================================
// Metric Columns (exact names, matched after lowercasing and trimming)
// =============================================================================

pub mod columns {
    pub const CHAT_TOTAL: &str = "qtde_chat_total";
    pub const CHAT_RATING: &str = "nota_chat";
    pub const CHAT_RATING_PCT: &str = "%_nota_chat";
    pub const CHAT_RESPONSE_TIME: &str = "tme_chat";

    pub const PHONE_TOTAL: &str = "total_pbx";
    pub const PHONE_RATING: &str = "nota_pbx";
    pub const PHONE_RATING_PCT: &str = "%_nota_pbx";
    pub const PHONE_RESPONSE_TIME: &str = "tme_pbx";
    pub const PHONE_RECEIVED: &str = "qtde_pbx_r";
    pub const PHONE_MADE: &str = "qtde_pbx_e";

    /// Per-queue chat volume columns: `qtde_chat_<queue>`
    pub const QUEUE_VOLUME_PATTERN: &str = r"^qtde_chat_(.+)$";

    /// Per-queue chat response time columns: `tme_chat_<queue>`
    pub const QUEUE_RESPONSE_TIME_PATTERN: &str = r"^tme_chat_(.+)$";
}

// =============================================================================
// Codec Markers
// =============================================================================

/// Placeholder the sheet uses for "no time recorded"
pub const TIME_PLACEHOLDER: &str = "-";

/// Ratings above this value are assumed to be on a 0-10 scale
pub const RATING_SCALE_LIMIT: f64 = 5.0;

// =============================================================================
// Queue Catalogs
// =============================================================================

/// Known chat queues of the support sheet: (slug, display label)
pub const SUPPORT_QUEUES: &[(&str, &str)] = &[
    ("suporte", "Suporte"),
    ("incidentes", "Incidentes"),
    ("visitas", "Visitas"),
    ("migracao_br", "Migração BR"),
];

/// Known chat queues of the customer service sheet: (slug, display label)
pub const CUSTOMER_SERVICE_QUEUES: &[(&str, &str)] = &[
    ("relacionamento", "Relacionamento"),
    ("bloqueios", "Bloqueios"),
    ("visitas", "Visitas"),
    ("migracao_br", "Migração BR"),
];

// =============================================================================
// Default Goals
// =============================================================================

pub const DEFAULT_SUPPORT_MIN_RATING: f64 = 4.45;
pub const DEFAULT_CUSTOMER_SERVICE_MIN_RATING: f64 = 4.55;
pub const DEFAULT_MIN_RATING_PCT: f64 = 0.50;
pub const DEFAULT_MAX_CHAT_RESPONSE_TIME: &str = "00:01:00";
pub const DEFAULT_MAX_PHONE_RESPONSE_TIME: &str = "00:00:10";

/// Snapshot lifetime before the workbook is fetched again
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Rows shown per ranking
pub const DEFAULT_RANKING_SIZE: usize = 10;

/// Config file name under the user config directory
pub const CONFIG_DIR_NAME: &str = "support-goals";
pub const CONFIG_FILE_NAME: &str = "goals.json";
