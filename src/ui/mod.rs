//! Transient UI state: the notification line and the level-up banner.
//!
//! Nothing is drawn here. The engine only decides which message is current
//! and when it lapses; a front end reads `Notification` and `LevelUpBanner`.

use bevy::prelude::*;
use crate::shared::*;

pub mod toast;

use toast::{expire_transients, handle_level_up_events, handle_toast_events};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Notification>()
            .init_resource::<LevelUpBanner>()
            .init_resource::<NoticeSettings>()
            // Messages posted during a reconcile pass show up immediately.
            .add_systems(
                ReconcilePass,
                (handle_toast_events, handle_level_up_events).in_set(ReconcileSet::Present),
            )
            .add_systems(Update, expire_transients.in_set(SimSet::Expire));
    }
}
