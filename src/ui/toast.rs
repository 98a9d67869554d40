use bevy::prelude::*;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// HANDLE TOAST EVENTS: the latest message replaces the line
// ═══════════════════════════════════════════════════════════════════════

pub fn handle_toast_events(
    mut events: EventReader<ToastEvent>,
    clock: Res<SimClock>,
    settings: Res<NoticeSettings>,
    mut notification: ResMut<Notification>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    notification.text = Some(event.message.clone());
    notification.expires_at = clock.now.after(settings.lifetime);
    debug!("[UI] Notice: {}", event.message);
}

// ═══════════════════════════════════════════════════════════════════════
// LEVEL-UP BANNER
// ═══════════════════════════════════════════════════════════════════════

pub fn handle_level_up_events(
    mut events: EventReader<LevelUpEvent>,
    clock: Res<SimClock>,
    settings: Res<NoticeSettings>,
    mut banner: ResMut<LevelUpBanner>,
) {
    let Some(level_up) = events.read().last() else {
        return;
    };
    banner.until = Some(clock.now.after(settings.lifetime));
    info!("[UI] Level up banner: level {}", level_up.level);
}

// ═══════════════════════════════════════════════════════════════════════
// EXPIRY
// ═══════════════════════════════════════════════════════════════════════

/// Clears the notification line and the banner once their time is up.
pub fn expire_transients(
    clock: Res<SimClock>,
    mut notification: ResMut<Notification>,
    mut banner: ResMut<LevelUpBanner>,
) {
    let now = clock.now;
    if notification.text.is_some() && notification.active(now).is_none() {
        notification.text = None;
    }
    if banner.until.is_some() && !banner.active(now) {
        banner.until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn build_ui_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<ToastEvent>()
            .add_event::<LevelUpEvent>()
            .insert_resource(SimClock::new(
                Duration::from_secs(1),
                Duration::from_secs(30),
            ))
            .init_resource::<NoticeSettings>()
            .init_resource::<Notification>()
            .init_resource::<LevelUpBanner>()
            .add_systems(
                Update,
                (handle_toast_events, handle_level_up_events, expire_transients).chain(),
            );
        app
    }

    fn set_now(app: &mut App, secs: u64) {
        let mut clock = app.world_mut().resource_mut::<SimClock>();
        clock.elapsed = Duration::from_secs(secs);
        clock.now = SimTime::from_secs(secs);
    }

    #[test]
    fn test_latest_toast_wins() {
        let mut app = build_ui_app();
        app.world_mut().send_event(ToastEvent::new("Harvested! +302 coins +20 XP"));
        app.world_mut().send_event(ToastEvent::new("🎉 Achievement Unlocked: First Harvest!"));
        app.update();

        let notification = app.world().resource::<Notification>();
        assert_eq!(
            notification.text.as_deref(),
            Some("🎉 Achievement Unlocked: First Harvest!")
        );
        assert_eq!(notification.expires_at, SimTime::from_secs(3));
    }

    #[test]
    fn test_notice_expires_after_lifetime() {
        let mut app = build_ui_app();
        app.world_mut().send_event(ToastEvent::new("Watered crop!"));
        app.update();

        set_now(&mut app, 2);
        app.update();
        assert!(app.world().resource::<Notification>().text.is_some());

        set_now(&mut app, 3);
        app.update();
        assert!(app.world().resource::<Notification>().text.is_none());
    }

    #[test]
    fn test_level_up_banner_lifecycle() {
        let mut app = build_ui_app();
        app.world_mut().send_event(LevelUpEvent {
            level: 2,
            coin_bonus: 500,
            message: Some("Unlocked: Advanced Crops!"),
        });
        app.update();
        assert!(app.world().resource::<LevelUpBanner>().active(SimTime::ZERO));

        set_now(&mut app, 4);
        app.update();
        assert_eq!(app.world().resource::<LevelUpBanner>().until, None);
    }
}
