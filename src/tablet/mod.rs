use octotablet::{
    builder::Builder,
    events::{Event, ToolEvent},
};
use std::panic::{self, AssertUnwindSafe};

/// Pen contact as seen through the tablet events, reduced to the pressure
/// the next pointer sample should carry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PenContact {
    down: bool,
    pressure: Option<f32>,
}

impl PenContact {
    pub fn down(&mut self) {
        self.down = true;
    }

    /// A pose update. Devices without a pressure axis leave it unknown.
    pub fn pose(&mut self, pressure: Option<f32>) {
        if self.down {
            self.pressure = pressure;
        }
    }

    pub fn up(&mut self) {
        self.down = false;
        self.pressure = None;
    }

    /// Pressure while the pen touches the surface.
    pub fn pressure(&self) -> Option<f32> {
        if self.down { self.pressure } else { None }
    }
}

/// Minimal tablet bridge: pumps octotablet events and tracks pen pressure.
/// Pointer positions still come from egui, which sees the pen as a mouse.
pub struct TabletInput {
    manager: octotablet::Manager,
    contact: PenContact,
}

impl TabletInput {
    /// Create a tablet manager using the eframe creation context for a window handle.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Option<Self> {
        let builder = Builder::new().emulate_tool_from_mouse(false);

        // octotablet can panic when the platform tablet service is missing.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            // Safety: the manager is dropped with the app, before the window.
            unsafe { builder.build_raw(cc) }
        }));

        match result {
            Ok(Ok(manager)) => Some(Self {
                manager,
                contact: PenContact::default(),
            }),
            Ok(Err(e)) => {
                log::warn!("tablet unavailable: {e:?}");
                None
            }
            Err(_) => {
                log::error!("tablet initialization panicked");
                None
            }
        }
    }

    /// Drain pending tablet events; returns the pressure to use now.
    pub fn poll(&mut self) -> Option<f32> {
        let events = match self.manager.pump() {
            Ok(events) => events,
            Err(e) => {
                log::debug!("tablet pump failed: {e:?}");
                return self.contact.pressure();
            }
        };
        for event in events {
            if let Event::Tool { event, .. } = event {
                match event {
                    ToolEvent::Down => self.contact.down(),
                    ToolEvent::Up | ToolEvent::Out | ToolEvent::Removed => self.contact.up(),
                    ToolEvent::Pose(pose) => self.contact.pose(pose.pressure.get()),
                    _ => {}
                }
            }
        }
        self.contact.pressure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_only_reported_while_down() {
        let mut pen = PenContact::default();
        pen.pose(Some(0.9));
        assert_eq!(pen.pressure(), None);

        pen.down();
        pen.pose(Some(0.4));
        assert_eq!(pen.pressure(), Some(0.4));
        pen.pose(None);
        assert_eq!(pen.pressure(), None);

        pen.pose(Some(0.7));
        pen.up();
        assert_eq!(pen.pressure(), None);
    }
}
