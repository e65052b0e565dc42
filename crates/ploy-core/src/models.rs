//! Data models for Ploy
//!
//! Defines the entities stored in the journal document: projects, ideas,
//! learning logs, wins and quarterly reflections, plus the settings record.
//!
//! Field names serialize in camelCase to stay compatible with backups
//! written by the browser app. Every record keeps fields it does not know
//! about in `extra`, so a document written by a newer version survives a
//! load/save or merge cycle untouched. A known field holding a value of the
//! wrong type reads as its default.
//!
//! Records are never edited through shared references. Every change goes
//! through a method that returns a new value, and the caller replaces the
//! old record in its collection.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::new_id;

/// Unknown fields carried through untouched
pub type Extra = Map<String, Value>;

/// Maximum number of support partners per project
pub const MAX_SUPPORT_PARTNERS: usize = 3;

/// Default review time of day (UTC)
pub const DEFAULT_REVIEW_TIME: &str = "20:00";

/// Default number of days between backup reminders
pub const DEFAULT_BACKUP_REMINDER_DAYS: u32 = 14;

/// Common view over every record kept in a document collection
pub trait Entity: Clone {
    /// Identifier, unique within the owning collection
    fn id(&self) -> &str;

    /// When the record was created
    fn created_at(&self) -> DateTime<Utc>;

    /// When the record was last updated, if it tracks updates
    fn updated_at(&self) -> Option<DateTime<Utc>>;

    /// `updatedAt`, falling back to `createdAt`
    fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at().unwrap_or_else(|| self.created_at())
    }
}

macro_rules! impl_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn created_at(&self) -> DateTime<Utc> {
                    self.created_at
                }

                fn updated_at(&self) -> Option<DateTime<Utc>> {
                    self.updated_at
                }
            }
        )+
    };
}

impl_entity!(Project, Idea, LearningLog, Win, QuarterlyReflection);

// ==================== Projects ====================

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Paused,
    Done,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Paused => "paused",
            ProjectStatus::Done => "done",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "paused" => Ok(ProjectStatus::Paused),
            "done" => Ok(ProjectStatus::Done),
            other => Err(format!(
                "unknown project status '{}' (expected active, paused or done)",
                other
            )),
        }
    }
}

/// How often a project is reviewed
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CadenceType {
    #[default]
    Weekly,
    Biweekly,
}

impl CadenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CadenceType::Weekly => "weekly",
            CadenceType::Biweekly => "biweekly",
        }
    }

    /// Days after the last review before the next one is due
    pub fn interval_days(&self) -> i64 {
        match self {
            CadenceType::Weekly => 7,
            CadenceType::Biweekly => 14,
        }
    }
}

impl std::str::FromStr for CadenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weekly" => Ok(CadenceType::Weekly),
            "biweekly" => Ok(CadenceType::Biweekly),
            other => Err(format!(
                "unknown cadence '{}' (expected weekly or biweekly)",
                other
            )),
        }
    }
}

/// Review schedule for a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Cadence {
    #[serde(rename = "type", deserialize_with = "crate::lenient::or_default")]
    pub kind: CadenceType,
    /// 0 = Sunday ... 6 = Saturday
    #[serde(deserialize_with = "crate::lenient::day_of_week")]
    pub day_of_week: u8,
    /// `HH:MM`, UTC
    #[serde(rename = "timeUTC", deserialize_with = "crate::lenient::string")]
    pub time_utc: String,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            kind: CadenceType::Weekly,
            day_of_week: 0,
            time_utc: DEFAULT_REVIEW_TIME.to_string(),
        }
    }
}

impl Cadence {
    /// Parsed review time, falling back to 20:00 when malformed
    pub fn time_of_day(&self) -> NaiveTime {
        NaiveTime::parse_from_str(&self.time_utc, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(DEFAULT_REVIEW_TIME, "%H:%M"))
            .unwrap_or_default()
    }

    /// Day of week clamped into 0..=6
    pub fn weekday_index(&self) -> u32 {
        u32::from(self.day_of_week % 7)
    }

    /// Next review slot strictly after `now`
    pub fn next_occurrence(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.weekday().num_days_from_sunday();
        let days_ahead = (self.weekday_index() + 7 - today) % 7;
        let date = now.date_naive() + Duration::days(i64::from(days_ahead));
        let candidate = date.and_time(self.time_of_day()).and_utc();
        if candidate > now {
            candidate
        } else {
            candidate + Duration::days(7)
        }
    }
}

/// Someone who helps keep a project moving
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SupportPartner {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub contact: String,
    #[serde(deserialize_with = "crate::lenient::string_list")]
    pub helps_with: Vec<String>,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub notes: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl SupportPartner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Copy with surrounding whitespace trimmed, or `None` if the name is blank
    fn normalized(&self) -> Option<Self> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            contact: self.contact.trim().to_string(),
            helps_with: self.helps_with.clone(),
            notes: self.notes.trim().to_string(),
            extra: self.extra.clone(),
        })
    }
}

/// Partial update for a support partner; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct SupportPartnerUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub helps_with: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// Input for [`Project::new`]
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub title: String,
    pub purpose: String,
    pub values: Vec<String>,
    pub beneficiaries: Vec<String>,
    pub cadence: Cadence,
    pub next_step: String,
    pub practice_strengths: Vec<String>,
    pub partner_needs: Vec<String>,
    pub support_partners: Vec<SupportPartner>,
}

/// A project tied to a purpose
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub purpose: String,
    #[serde(deserialize_with = "crate::lenient::string_list")]
    pub values: Vec<String>,
    #[serde(deserialize_with = "crate::lenient::string_list")]
    pub beneficiaries: Vec<String>,
    #[serde(deserialize_with = "crate::lenient::or_default")]
    pub status: ProjectStatus,
    #[serde(deserialize_with = "crate::lenient::or_default")]
    pub cadence: Cadence,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub next_step: String,
    #[serde(deserialize_with = "crate::lenient::string_list")]
    pub practice_strengths: Vec<String>,
    #[serde(deserialize_with = "crate::lenient::string_list")]
    pub partner_needs: Vec<String>,
    #[serde(deserialize_with = "crate::lenient::list")]
    pub support_partners: Vec<SupportPartner>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::opt_string"
    )]
    pub reflection_note: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::lenient::or_default")]
    pub last_review_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::lenient::or_default")]
    pub created_at: DateTime<Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Project {
    /// Create a new active project
    pub fn new(data: NewProject) -> Self {
        let now = Utc::now();
        let title = data.title.trim();
        let support_partners = data
            .support_partners
            .iter()
            .filter_map(SupportPartner::normalized)
            .take(MAX_SUPPORT_PARTNERS)
            .collect();

        Self {
            id: new_id(),
            title: if title.is_empty() {
                "Untitled Project".to_string()
            } else {
                title.to_string()
            },
            purpose: data.purpose,
            values: data.values,
            beneficiaries: data.beneficiaries,
            status: ProjectStatus::Active,
            cadence: data.cadence,
            next_step: data.next_step,
            practice_strengths: data.practice_strengths,
            partner_needs: data.partner_needs,
            support_partners,
            reflection_note: None,
            completed_at: None,
            last_review_at: None,
            created_at: now,
            updated_at: Some(now),
            extra: Extra::new(),
        }
    }

    /// Copy with `edit` applied and `updatedAt` refreshed
    pub fn updated(&self, edit: impl FnOnce(&mut Project)) -> Project {
        let mut next = self.clone();
        edit(&mut next);
        next.updated_at = Some(Utc::now());
        next
    }

    /// Copy with a new status; moving to `done` stamps `completedAt`
    pub fn with_status(&self, status: ProjectStatus, reflection_note: Option<&str>) -> Project {
        self.updated(|p| {
            p.status = status;
            if let Some(note) = reflection_note.filter(|n| !n.is_empty()) {
                p.reflection_note = Some(note.to_string());
            }
            if status == ProjectStatus::Done {
                p.completed_at = Some(Utc::now());
            }
        })
    }

    /// Copy marked as reviewed now
    pub fn reviewed(&self) -> Project {
        self.reviewed_at(Utc::now())
    }

    /// Copy marked as reviewed at `at`, never earlier than `createdAt`
    pub fn reviewed_at(&self, at: DateTime<Utc>) -> Project {
        let at = at.max(self.created_at);
        let mut next = self.clone();
        next.last_review_at = Some(at);
        next.updated_at = Some(at.max(Utc::now()));
        next
    }

    /// Copy with a support partner appended
    ///
    /// Unchanged when the project already has three partners or the name is
    /// blank.
    pub fn with_support_partner(&self, partner: SupportPartner) -> Project {
        if self.support_partners.len() >= MAX_SUPPORT_PARTNERS {
            return self.clone();
        }
        match partner.normalized() {
            Some(partner) => self.updated(|p| p.support_partners.push(partner)),
            None => self.clone(),
        }
    }

    /// Copy with the partner at `index` updated; out-of-range is a no-op
    pub fn with_updated_support_partner(
        &self,
        index: usize,
        update: SupportPartnerUpdate,
    ) -> Project {
        let Some(current) = self.support_partners.get(index) else {
            return self.clone();
        };
        let merged = SupportPartner {
            name: update.name.unwrap_or_else(|| current.name.clone()),
            contact: update.contact.unwrap_or_else(|| current.contact.clone()),
            helps_with: update
                .helps_with
                .unwrap_or_else(|| current.helps_with.clone()),
            notes: update.notes.unwrap_or_else(|| current.notes.clone()),
            extra: current.extra.clone(),
        };
        match merged.normalized() {
            Some(partner) => self.updated(|p| p.support_partners[index] = partner),
            None => self.clone(),
        }
    }

    /// Copy without the partner at `index`; out-of-range is a no-op
    pub fn without_support_partner(&self, index: usize) -> Project {
        if index >= self.support_partners.len() {
            return self.clone();
        }
        self.updated(|p| {
            p.support_partners.remove(index);
        })
    }

    /// Copy with the partner list replaced (blank names dropped, max three)
    pub fn with_support_partners(&self, partners: &[SupportPartner]) -> Project {
        let partners = partners
            .iter()
            .filter_map(SupportPartner::normalized)
            .take(MAX_SUPPORT_PARTNERS)
            .collect();
        self.updated(|p| p.support_partners = partners)
    }

    /// Whether an active project is due for review at `now`
    pub fn is_review_due(&self, now: DateTime<Utc>) -> bool {
        if self.status != ProjectStatus::Active {
            return false;
        }
        match self.last_review_at {
            None => true,
            Some(last) => (now - last).num_days() >= self.cadence.kind.interval_days(),
        }
    }

    /// Next scheduled review slot after `now`
    pub fn next_review_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.cadence.next_occurrence(now)
    }
}

// ==================== Ideas ====================

/// A captured idea, optionally attached to a project
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Idea {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "crate::lenient::opt_string")]
    pub project_id: Option<String>,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub text: String,
    #[serde(deserialize_with = "crate::lenient::or_default")]
    pub created_at: DateTime<Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::lenient::or_default")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::lenient::opt_string")]
    pub promoted_to_project_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Idea {
    pub fn new(text: impl Into<String>, project_id: Option<String>) -> Self {
        Self {
            id: new_id(),
            project_id: project_id.filter(|id| !id.is_empty()),
            text: text.into(),
            created_at: Utc::now(),
            updated_at: None,
            archived_at: None,
            promoted_to_project_id: None,
            extra: Extra::new(),
        }
    }

    /// Copy with `edit` applied and `updatedAt` refreshed
    pub fn updated(&self, edit: impl FnOnce(&mut Idea)) -> Idea {
        let mut next = self.clone();
        edit(&mut next);
        next.updated_at = Some(Utc::now());
        next
    }

    pub fn archived(&self) -> Idea {
        self.updated(|i| i.archived_at = Some(Utc::now()))
    }

    pub fn unarchived(&self) -> Idea {
        self.updated(|i| i.archived_at = None)
    }

    pub fn assigned_to(&self, project_id: Option<String>) -> Idea {
        self.updated(|i| i.project_id = project_id)
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Turn the idea into a new project
    ///
    /// Returns the project and the idea marked as promoted to it. A blank
    /// title falls back to the first 60 characters of the idea text.
    pub fn promote(&self, mut data: NewProject) -> (Project, Idea) {
        if data.title.trim().is_empty() {
            data.title = self.text.chars().take(60).collect();
        }
        let project = Project::new(data);
        let idea = self.updated(|i| i.promoted_to_project_id = Some(project.id.clone()));
        (project, idea)
    }
}

// ==================== Learning logs ====================

/// A learning journal entry for a project
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LearningLog {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub project_id: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub learned: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub next_excited: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub impact_note: String,
    #[serde(deserialize_with = "crate::lenient::or_default")]
    pub created_at: DateTime<Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl LearningLog {
    pub fn new(project_id: impl Into<String>, learned: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            project_id: project_id.into(),
            learned: learned.into(),
            next_excited: String::new(),
            impact_note: String::new(),
            created_at: Utc::now(),
            updated_at: None,
            extra: Extra::new(),
        }
    }

    pub fn with_next_excited(mut self, next_excited: impl Into<String>) -> Self {
        self.next_excited = next_excited.into();
        self
    }

    pub fn with_impact_note(mut self, impact_note: impl Into<String>) -> Self {
        self.impact_note = impact_note.into();
        self
    }

    /// Copy with `edit` applied and `updatedAt` refreshed
    pub fn updated(&self, edit: impl FnOnce(&mut LearningLog)) -> LearningLog {
        let mut next = self.clone();
        edit(&mut next);
        next.updated_at = Some(Utc::now());
        next
    }
}

// ==================== Wins ====================

/// What sort of win was celebrated
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WinKind {
    #[default]
    Small,
    Milestone,
    Gratitude,
}

impl WinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WinKind::Small => "small",
            WinKind::Milestone => "milestone",
            WinKind::Gratitude => "gratitude",
        }
    }
}

impl std::str::FromStr for WinKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(WinKind::Small),
            "milestone" => Ok(WinKind::Milestone),
            "gratitude" => Ok(WinKind::Gratitude),
            other => Err(format!(
                "unknown win kind '{}' (expected small, milestone or gratitude)",
                other
            )),
        }
    }
}

/// A celebrated win on a project
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Win {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub project_id: String,
    #[serde(deserialize_with = "crate::lenient::or_default")]
    pub kind: WinKind,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub note: String,
    #[serde(deserialize_with = "crate::lenient::or_default")]
    pub created_at: DateTime<Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Win {
    pub fn new(project_id: impl Into<String>, kind: WinKind, note: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            project_id: project_id.into(),
            kind,
            note: note.into(),
            created_at: Utc::now(),
            updated_at: None,
            extra: Extra::new(),
        }
    }

    /// Copy with `edit` applied and `updatedAt` refreshed
    pub fn updated(&self, edit: impl FnOnce(&mut Win)) -> Win {
        let mut next = self.clone();
        edit(&mut next);
        next.updated_at = Some(Utc::now());
        next
    }
}

// ==================== Quarterly reflections ====================

/// Quarter-level goals and support plan
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct QuarterlyReflection {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub id: String,
    /// e.g. "Q4 2025"
    #[serde(deserialize_with = "crate::lenient::string")]
    pub quarter_label: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub goals: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub success_definition: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub risks: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub support_plan: String,
    #[serde(deserialize_with = "crate::lenient::or_default")]
    pub is_current: bool,
    #[serde(deserialize_with = "crate::lenient::or_default")]
    pub created_at: DateTime<Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl QuarterlyReflection {
    pub fn new(quarter_label: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            quarter_label: quarter_label.into(),
            goals: String::new(),
            success_definition: String::new(),
            risks: String::new(),
            support_plan: String::new(),
            is_current: false,
            created_at: now,
            updated_at: Some(now),
            extra: Extra::new(),
        }
    }

    /// Copy with `edit` applied and `updatedAt` refreshed
    pub fn updated(&self, edit: impl FnOnce(&mut QuarterlyReflection)) -> QuarterlyReflection {
        let mut next = self.clone();
        edit(&mut next);
        next.updated_at = Some(Utc::now());
        next
    }
}

// ==================== Settings ====================

/// Accountability contact
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Accountability {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub contact: String,
}

/// User settings
///
/// Every field is optional so that a merge can tell "absent" apart from
/// "set"; the accessors supply the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub default_review_day: Option<u8>,
    #[serde(
        rename = "defaultReviewTimeUTC",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub default_review_time_utc: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub last_backup_at: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub backup_reminder_days: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub timezone: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub strengths: Option<Vec<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub support_needs: Option<Vec<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::or_default"
    )]
    pub accountability: Option<Accountability>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Settings {
    /// Settings for a fresh document
    pub fn initial() -> Self {
        Self {
            default_review_day: Some(0),
            default_review_time_utc: Some(DEFAULT_REVIEW_TIME.to_string()),
            last_backup_at: None,
            backup_reminder_days: Some(DEFAULT_BACKUP_REMINDER_DAYS),
            timezone: Some("UTC".to_string()),
            strengths: Some(Vec::new()),
            support_needs: Some(Vec::new()),
            accountability: Some(Accountability::default()),
            extra: Extra::new(),
        }
    }

    /// Shallow merge: every key present in `incoming` wins, absent keys keep
    /// the value from `self`
    pub fn merged_with(&self, incoming: &Settings) -> Settings {
        let mut extra = self.extra.clone();
        extra.extend(incoming.extra.clone());

        Settings {
            default_review_day: incoming.default_review_day.or(self.default_review_day),
            default_review_time_utc: incoming
                .default_review_time_utc
                .clone()
                .or_else(|| self.default_review_time_utc.clone()),
            last_backup_at: incoming.last_backup_at.or(self.last_backup_at),
            backup_reminder_days: incoming.backup_reminder_days.or(self.backup_reminder_days),
            timezone: incoming.timezone.clone().or_else(|| self.timezone.clone()),
            strengths: incoming.strengths.clone().or_else(|| self.strengths.clone()),
            support_needs: incoming
                .support_needs
                .clone()
                .or_else(|| self.support_needs.clone()),
            accountability: incoming
                .accountability
                .clone()
                .or_else(|| self.accountability.clone()),
            extra,
        }
    }

    pub fn backup_reminder_days(&self) -> u32 {
        self.backup_reminder_days
            .unwrap_or(DEFAULT_BACKUP_REMINDER_DAYS)
    }

    /// Default cadence for new projects
    pub fn default_cadence(&self) -> Cadence {
        Cadence {
            kind: CadenceType::Weekly,
            day_of_week: self.default_review_day.unwrap_or(0) % 7,
            time_utc: self
                .default_review_time_utc
                .clone()
                .unwrap_or_else(|| DEFAULT_REVIEW_TIME.to_string()),
        }
    }
}
