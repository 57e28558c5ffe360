use crate::{
    settings::settings_model::{BusinessEvent, EnhancedTriggerOption},
    widget::host::{TimerId, WidgetHost},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArmedTrigger {
    index: usize,
    timer: TimerId,
}

/// Owns one timer per armed trigger and maps timer callbacks back to the
/// trigger that scheduled them.
///
/// `page_visit` triggers arm on mount; the other business events arm when
/// the host reports them. Simultaneously enabled triggers are not ranked:
/// whichever timer fires first opens the widget.
#[derive(Debug, Clone, Default)]
pub struct TriggerScheduler {
    triggers: Vec<EnhancedTriggerOption>,
    armed: Vec<ArmedTrigger>,
}

impl TriggerScheduler {
    pub fn new(triggers: &[EnhancedTriggerOption]) -> Self {
        for trigger in triggers.iter().filter(|t| t.enabled) {
            if let BusinessEvent::Other(tag) = &trigger.business_event {
                eprintln!("Warning: trigger event '{}' is not supported, ignoring", tag);
            }
        }

        Self {
            triggers: triggers.to_vec(),
            armed: Vec::new(),
        }
    }

    /// Arm every enabled trigger listening for `event`. Returns how many
    /// timers were started. Re-arming a trigger restarts its delay.
    pub fn arm_for<H: WidgetHost + ?Sized>(&mut self, event: &BusinessEvent, host: &mut H) -> usize {
        if matches!(event, BusinessEvent::Other(_)) {
            return 0;
        }

        let mut started = 0;
        for (index, trigger) in self.triggers.iter().enumerate() {
            if !trigger.enabled || &trigger.business_event != event {
                continue;
            }

            let Some(delay_ms) = trigger.delay_ms() else {
                eprintln!(
                    "Warning: trigger {} has a non-numeric delay '{}', not arming",
                    index, trigger.delay
                );
                continue;
            };

            if let Some(pos) = self.armed.iter().position(|a| a.index == index) {
                let previous = self.armed.remove(pos);
                host.clear_timer(previous.timer);
            }

            let timer = host.set_timer(delay_ms);
            self.armed.push(ArmedTrigger { index, timer });
            started += 1;
        }
        started
    }

    /// Arm the triggers that start counting as soon as the page is visited.
    pub fn arm_on_mount<H: WidgetHost + ?Sized>(&mut self, host: &mut H) -> usize {
        self.arm_for(&BusinessEvent::PageVisit, host)
    }

    /// Consume a timer callback. Returns the trigger that fired, or `None`
    /// for a timer this scheduler no longer owns.
    pub fn fire(&mut self, timer: TimerId) -> Option<&EnhancedTriggerOption> {
        let pos = self.armed.iter().position(|a| a.timer == timer)?;
        let armed = self.armed.remove(pos);
        self.triggers.get(armed.index)
    }

    /// Clear every outstanding timer.
    pub fn disarm_all<H: WidgetHost + ?Sized>(&mut self, host: &mut H) {
        for armed in self.armed.drain(..) {
            host.clear_timer(armed.timer);
        }
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }
}
