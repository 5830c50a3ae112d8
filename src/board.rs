//! The board: one list-sync controller per entity kind and the selected page

use std::sync::{Arc, Mutex};

use log::info;
use serde::Serialize;

use crate::controller::{ListSync, SubmitOutcome, SyncOptions};
use crate::schema::{Beverages, Entity, EntityKind, FormValues, Guests, Meals, Utensils};
use crate::store::Store;
use crate::view::PanelView;

/// Which panel is visible
pub type Page = EntityKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitResponse {
    pub outcome: SubmitOutcome,
    pub panel: PanelView,
}

pub struct Board<S: Store> {
    guests: ListSync<Guests, S>,
    meals: ListSync<Meals, S>,
    beverages: ListSync<Beverages, S>,
    utensils: ListSync<Utensils, S>,
    page: Mutex<Page>,
    options: SyncOptions,
}

macro_rules! with_panel {
    ($board:expr, $kind:expr, |$ctl:ident| $body:expr) => {
        match $kind {
            EntityKind::Guests => {
                let $ctl = &$board.guests;
                $body
            }
            EntityKind::Meals => {
                let $ctl = &$board.meals;
                $body
            }
            EntityKind::Beverages => {
                let $ctl = &$board.beverages;
                $body
            }
            EntityKind::Utensils => {
                let $ctl = &$board.utensils;
                $body
            }
        }
    };
}

impl<S: Store> Board<S> {
    pub fn new(store: Arc<S>, options: SyncOptions) -> Self {
        Self {
            guests: ListSync::new(store.clone(), options),
            meals: ListSync::new(store.clone(), options),
            beverages: ListSync::new(store.clone(), options),
            utensils: ListSync::new(store, options),
            page: Mutex::new(Page::default()),
            options,
        }
    }

    pub fn page(&self) -> Page {
        *self.page.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Shows `page`, unmounting the previous panel and loading the new one
    pub async fn select(&self, page: Page) -> PanelView {
        let previous = {
            let mut current = self.page.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *current, page)
        };
        if previous != page {
            info!("[board] Switching from {} to {}", previous, page);
            with_panel!(self, previous, |ctl| ctl.reset());
        }
        self.refresh(page).await
    }

    /// Initial load of the visible panel
    pub async fn mount(&self) -> PanelView {
        self.refresh(self.page()).await
    }

    pub async fn refresh(&self, kind: EntityKind) -> PanelView {
        with_panel!(self, kind, |ctl| {
            ctl.refresh().await;
            self.render(ctl)
        })
    }

    pub async fn submit(&self, kind: EntityKind, form: &FormValues) -> SubmitResponse {
        with_panel!(self, kind, |ctl| {
            let outcome = ctl.submit(form).await;
            SubmitResponse {
                outcome,
                panel: self.render(ctl),
            }
        })
    }

    /// Current view of a panel without touching the store
    pub fn view(&self, kind: EntityKind) -> PanelView {
        with_panel!(self, kind, |ctl| self.render(ctl))
    }

    fn render<E: Entity>(&self, ctl: &ListSync<E, S>) -> PanelView {
        PanelView::build::<E>(&ctl.snapshot(), self.options.seed_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedStore;
    use serde_json::json;

    #[tokio::test]
    async fn switching_pages_unmounts_the_previous_panel() {
        let store = Arc::new(ScriptedStore::new());
        store.set_rows(
            "guests",
            vec![json!({"id": 1, "first_name": "Ada", "last_name": "Lovelace"})],
        );
        store.set_rows("meals", vec![json!({"guest_name": "Bob", "meal": "Chili"})]);
        let board = Board::new(store.clone(), SyncOptions::default());

        let guests = board.mount().await;
        assert_eq!(guests.rows, ["Ada Lovelace"]);

        let meals = board.select(EntityKind::Meals).await;
        assert_eq!(board.page(), EntityKind::Meals);
        assert_eq!(meals.rows, ["Bob: Chili"]);
        assert_eq!(
            board.view(EntityKind::Guests).empty_message.as_deref(),
            Some("No guests yet.")
        );
        assert_eq!(store.requests(), ["GET guests", "GET meals"]);
    }

    #[tokio::test]
    async fn reselecting_the_same_page_refreshes_it() {
        let store = Arc::new(ScriptedStore::new());
        let board = Board::new(store.clone(), SyncOptions::default());
        board.select(EntityKind::Guests).await;
        board.select(EntityKind::Guests).await;
        assert_eq!(store.requests(), ["GET guests", "GET guests"]);
    }
}
