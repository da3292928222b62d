//! Notification log for the presentation layer.
//!
//! Every simulation event worth telling the user about is appended to a
//! newest-first history and pushed onto a display stack. The presentation
//! layer shows the head of the stack; dismissing it pops the head and may
//! chain a follow-up notification. A kind already waiting on the stack is not
//! pushed twice, so the same concept never overlaps on screen.

use garden_common::NotificationId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::info;

use crate::plants::Species;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// No empty plot for a new sprout.
    NoSpace,
    /// Manual pollination aimed at an invalid plant.
    InvalidPollination,
    /// Apple pollinated by a direct relative.
    AppleIncompatibility,
    /// Two small unrelated parents produced a hybrid.
    Heterosis,
    /// Related parents produced a small offspring.
    InbreedingDepression,
    /// Regular bee cross-pollination.
    CrossPollination(Species),
    /// Regular wind pollination of corn.
    CornPollination,
    /// Wind arrived without enough grown corn.
    NoCornToPollinate,
    /// A lone flower pollinated itself.
    SelfPollination(Species),
    /// A bean fixed nitrogen and got boosted.
    NitrogenFixation,
    /// A bean pollinated itself.
    BeanSelfPollination,
    /// Harvested bean will become green manure.
    GreenManureTip,
    /// Green manure applied to the other plots.
    GreenManureApplied,
    /// Pesticide killed the bees.
    EnvironmentalHarm,
    /// How to get the bees back.
    PesticideTip,
}

impl NotificationKind {
    /// Get the title shown to the user.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::NoSpace => "Sem Espaço!",
            Self::InvalidPollination => "Polinização Inválida",
            Self::AppleIncompatibility => "Autoincompatibilidade",
            Self::Heterosis => "Vigor Híbrido!",
            Self::InbreedingDepression => "Depressão Endogâmica",
            Self::CrossPollination(_) => "Polinização Cruzada",
            Self::CornPollination => "Polinização pelo Vento",
            Self::NoCornToPollinate => "Sem Milho para Polinizar",
            Self::SelfPollination(_) => "Autopolinização",
            Self::NitrogenFixation => "Fixação de Nitrogênio",
            Self::BeanSelfPollination => "Autogamia do Feijão",
            Self::GreenManureTip => "Adubo Verde",
            Self::GreenManureApplied => "Solo Enriquecido",
            Self::EnvironmentalHarm => "Dano Ambiental",
            Self::PesticideTip => "Traga as Abelhas de Volta",
        }
    }

    /// Get the message body shown to the user.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::NoSpace => "Não há espaço livre no jardim para uma nova muda.".to_string(),
            Self::InvalidPollination => {
                "Escolha duas plantas adultas da mesma espécie para polinizar.".to_string()
            },
            Self::AppleIncompatibility => {
                "Macieiras rejeitam o pólen de parentes diretos (autoincompatibilidade gametofítica)."
                    .to_string()
            },
            Self::Heterosis => {
                "Dois pais pequenos e sem parentesco geraram um híbrido vigoroso.".to_string()
            },
            Self::InbreedingDepression => {
                "Pais aparentados geraram uma muda pequena e fraca.".to_string()
            },
            Self::CrossPollination(species) => format!(
                "As abelhas levaram pólen de um pé de {} para outro.",
                species.display_name()
            ),
            Self::CornPollination => "O vento espalhou o pólen do milho.".to_string(),
            Self::NoCornToPollinate => {
                "O vento chegou, mas não há milho adulto suficiente para polinizar.".to_string()
            },
            Self::SelfPollination(species) => format!(
                "Sem abelhas por perto, o pé de {} se autopolinizou.",
                species.display_name()
            ),
            Self::NitrogenFixation => {
                "O feijão fixou nitrogênio no solo e ficou mais forte.".to_string()
            },
            Self::BeanSelfPollination => "O feijão se autopolinizou naturalmente.".to_string(),
            Self::GreenManureTip => {
                "Os restos do feijão colhido serão incorporados ao solo como adubo verde.".to_string()
            },
            Self::GreenManureApplied => {
                "As plantas do jardim receberam o adubo verde do feijão.".to_string()
            },
            Self::EnvironmentalHarm => "O fertilizante químico matou as abelhas.".to_string(),
            Self::PesticideTip => {
                "Colha as plantas com fertilizante químico para que as abelhas voltem.".to_string()
            },
        }
    }

    /// Notification chained after this one is dismissed.
    #[must_use]
    pub fn follow_up(self) -> Option<Self> {
        match self {
            Self::EnvironmentalHarm => Some(Self::PesticideTip),
            _ => None,
        }
    }
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique id within the log.
    pub id: NotificationId,
    /// Event kind.
    pub kind: NotificationKind,
    /// Title text.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Model time of emission in milliseconds.
    pub timestamp: u64,
    /// Not yet seen in the history panel.
    pub is_new: bool,
}

/// Entry on the display stack.
#[derive(Debug, Clone)]
struct Displayed {
    notification: Notification,
    on_dismiss: Option<NotificationKind>,
}

/// History plus display stack of notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    /// Newest first.
    history: VecDeque<Notification>,
    /// Top of the stack is the last element.
    stack: Vec<Displayed>,
    next_id: u64,
}

impl NotificationLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notification and show it unless the same kind is already showing.
    pub fn emit(&mut self, kind: NotificationKind, timestamp: u64) -> NotificationId {
        let id = NotificationId::new(self.next_id);
        self.next_id += 1;

        let notification = Notification {
            id,
            kind,
            title: kind.title().to_string(),
            message: kind.message(),
            timestamp,
            is_new: true,
        };
        info!(at = timestamp, title = %notification.title, "{}", notification.message);

        if !self.stack.iter().any(|d| d.notification.kind == kind) {
            self.stack.push(Displayed {
                notification: notification.clone(),
                on_dismiss: kind.follow_up(),
            });
        }
        self.history.push_front(notification);
        id
    }

    /// Notification currently shown (top of the stack).
    #[must_use]
    pub fn head(&self) -> Option<&Notification> {
        self.stack.last().map(|d| &d.notification)
    }

    /// Number of notifications waiting on the display stack.
    #[must_use]
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Dismiss the shown notification, emitting its follow-up if it has one.
    pub fn dismiss(&mut self, timestamp: u64) -> Option<Notification> {
        let displayed = self.stack.pop()?;
        if let Some(next) = displayed.on_dismiss {
            self.emit(next, timestamp);
        }
        Some(displayed.notification)
    }

    /// Iterate over the history, newest first.
    pub fn history(&self) -> impl Iterator<Item = &Notification> {
        self.history.iter()
    }

    /// Mark every history entry as read (history panel opened).
    pub fn open_history(&mut self) {
        for notification in &mut self.history {
            notification.is_new = false;
        }
    }

    /// Number of unread history entries.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.history.iter().filter(|n| n.is_new).count()
    }

    /// Number of history entries of a kind.
    #[must_use]
    pub fn count_of(&self, kind: NotificationKind) -> usize {
        self.history.iter().filter(|n| n.kind == kind).count()
    }

    /// Total number of history entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Check if nothing was ever emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
