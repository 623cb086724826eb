//! Linux implementation of [`InputDriver`]: evdev capture, uinput emulation,
//! `arboard` clipboard access.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use edgelink_types::screen::Screen;
use edgelink_types::{ButtonState, InputEvent, KeyCode, MouseButton};
use evdev::uinput::VirtualDevice;
use evdev::{AttributeSet, Device, EventSummary, EventType, KeyCode as EvdevKey, RelativeAxisCode};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::keymap;
use crate::error::InputError;
use crate::InputDriver;

/// Linux input driver: evdev for capture, uinput for emulation.
///
/// Screens are supplied at construction rather than queried from the
/// display server, mirroring the teacher daemon's config-supplied
/// `ScreenGeometry` rather than a true display-enumeration API.
pub struct LinuxInputDriver {
    screens: Vec<Screen>,
    cursor: Arc<Mutex<(i32, i32)>>,
    capture_paths: Mutex<Vec<PathBuf>>,
    capture_task: Mutex<Option<JoinHandle<()>>>,
    vdev: Mutex<VirtualDevice>,
}

impl LinuxInputDriver {
    pub fn new(screens: Vec<Screen>) -> Result<Self, InputError> {
        let vdev = build_virtual_device(&screens)?;
        Ok(Self {
            screens,
            cursor: Arc::new(Mutex::new((0, 0))),
            capture_paths: Mutex::new(Vec::new()),
            capture_task: Mutex::new(None),
            vdev: Mutex::new(vdev),
        })
    }

    fn keyboard_and_mouse_devices() -> Vec<(PathBuf, Device)> {
        evdev::enumerate()
            .filter(|(_, device)| {
                let supported = device.supported_events();
                let has_keys = supported.contains(EventType::KEY)
                    && device
                        .supported_keys()
                        .is_some_and(|k| k.contains(EvdevKey::KEY_A) || k.contains(EvdevKey::BTN_LEFT));
                let has_motion = supported.contains(EventType::RELATIVE);
                has_keys || has_motion
            })
            .collect()
    }
}

#[async_trait]
impl InputDriver for LinuxInputDriver {
    async fn pointer_position(&self) -> Result<(i32, i32), InputError> {
        Ok(*self.cursor.lock().unwrap())
    }

    async fn warp_pointer(&self, x: i32, y: i32) -> Result<(), InputError> {
        *self.cursor.lock().unwrap() = (x, y);
        Ok(())
    }

    async fn begin_capture(&mut self, suppress: bool) -> Result<mpsc::Receiver<InputEvent>, InputError> {
        let devices = Self::keyboard_and_mouse_devices();
        if devices.is_empty() {
            return Err(InputError::DeviceOpen(
                "no keyboard or mouse devices found".to_string(),
            ));
        }

        let (tx, rx) = mpsc::channel(1024);
        let mut paths = Vec::new();
        let mut handles = Vec::new();

        for (path, mut device) in devices {
            if suppress {
                if let Err(e) = device.grab() {
                    warn!(path = %path.display(), error = %e, "failed to grab device");
                }
            }
            paths.push(path.clone());

            let tx = tx.clone();
            let cursor = Arc::clone(&self.cursor);
            let handle = tokio::spawn(async move {
                let mut stream = match device.into_event_stream() {
                    Ok(s) => s,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to create event stream");
                        return;
                    }
                };
                loop {
                    match stream.next_event().await {
                        Ok(ev) => {
                            if let Some(event) = convert_evdev_event(&ev, &cursor) {
                                if tx.send(event).await.is_err() {
                                    break;
                                }
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "device read error");
                            break;
                        }
                    }
                }
            });
            handles.push(handle);
        }

        *self.capture_paths.lock().unwrap() = paths;
        *self.capture_task.lock().unwrap() = Some(tokio::spawn(async move {
            for h in handles {
                let _ = h.await;
            }
        }));

        info!(suppress, "input capture started");
        Ok(rx)
    }

    async fn end_capture(&mut self) -> Result<(), InputError> {
        if let Some(handle) = self.capture_task.lock().unwrap().take() {
            handle.abort();
        }
        for path in self.capture_paths.lock().unwrap().drain(..) {
            if let Ok(mut device) = Device::open(&path) {
                let _ = device.ungrab();
            }
        }
        info!("input capture ended");
        Ok(())
    }

    async fn synthesise_mouse_move(&self, x: i32, y: i32, absolute: bool) -> Result<(), InputError> {
        let mut vdev = self.vdev.lock().unwrap();
        let events = if absolute {
            vec![
                evdev::InputEvent::new(EventType::ABSOLUTE.0, evdev::AbsoluteAxisCode::ABS_X.0, x),
                evdev::InputEvent::new(EventType::ABSOLUTE.0, evdev::AbsoluteAxisCode::ABS_Y.0, y),
            ]
        } else {
            vec![
                evdev::InputEvent::new(EventType::RELATIVE.0, RelativeAxisCode::REL_X.0, x),
                evdev::InputEvent::new(EventType::RELATIVE.0, RelativeAxisCode::REL_Y.0, y),
            ]
        };
        vdev.emit(&events)
            .map_err(|e| InputError::Inject(e.to_string()))
    }

    async fn synthesise_mouse_button(
        &self,
        button: MouseButton,
        down: bool,
    ) -> Result<(), InputError> {
        let key = keymap::mouse_button_to_evdev_key(button);
        let value = keymap::button_state_to_evdev_value(if down { ButtonState::Down } else { ButtonState::Up });
        let event = evdev::InputEvent::new(EventType::KEY.0, key.0, value);
        self.vdev
            .lock()
            .unwrap()
            .emit(&[event])
            .map_err(|e| InputError::Inject(e.to_string()))
    }

    async fn synthesise_mouse_scroll(&self, delta_x: i32, delta_y: i32) -> Result<(), InputError> {
        let events = [
            evdev::InputEvent::new(EventType::RELATIVE.0, RelativeAxisCode::REL_HWHEEL.0, delta_x),
            evdev::InputEvent::new(EventType::RELATIVE.0, RelativeAxisCode::REL_WHEEL.0, delta_y),
        ];
        self.vdev
            .lock()
            .unwrap()
            .emit(&events)
            .map_err(|e| InputError::Inject(e.to_string()))
    }

    async fn synthesise_key(&self, code: KeyCode, down: bool) -> Result<(), InputError> {
        let key = keymap::keycode_to_evdev_key(code);
        let value = keymap::button_state_to_evdev_value(if down { ButtonState::Down } else { ButtonState::Up });
        let event = evdev::InputEvent::new(EventType::KEY.0, key.0, value);
        self.vdev
            .lock()
            .unwrap()
            .emit(&[event])
            .map_err(|e| InputError::Inject(e.to_string()))
    }

    async fn get_clipboard_text(&self) -> Result<String, InputError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| InputError::Clipboard(e.to_string()))?;
        clipboard
            .get_text()
            .map_err(|e| InputError::Clipboard(e.to_string()))
    }

    async fn set_clipboard_text(&self, text: &str) -> Result<(), InputError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| InputError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| InputError::Clipboard(e.to_string()))
    }

    async fn enumerate_screens(&self) -> Result<Vec<Screen>, InputError> {
        Ok(self.screens.clone())
    }
}

/// Build the uinput virtual device, registering EV_ABS support for ABS_X/
/// ABS_Y alongside EV_KEY/EV_REL — `synthesise_mouse_move`'s `absolute: true`
/// path emits into these axes, and the kernel drops ABS events from a device
/// that never declared them. Bounds cover this host's own screen layout,
/// since CONTROLLED-mode absolute moves position the cursor on this machine.
fn build_virtual_device(screens: &[Screen]) -> Result<VirtualDevice, InputError> {
    let mut keys = AttributeSet::<EvdevKey>::new();
    for code in 1..=248 {
        keys.insert(EvdevKey(code));
    }
    keys.insert(EvdevKey::BTN_LEFT);
    keys.insert(EvdevKey::BTN_RIGHT);
    keys.insert(EvdevKey::BTN_MIDDLE);

    let mut rel = AttributeSet::<RelativeAxisCode>::new();
    rel.insert(RelativeAxisCode::REL_X);
    rel.insert(RelativeAxisCode::REL_Y);
    rel.insert(RelativeAxisCode::REL_WHEEL);
    rel.insert(RelativeAxisCode::REL_HWHEEL);

    let (max_x, max_y) = screens
        .iter()
        .fold((0, 0), |(mx, my), s| (mx.max(s.right()), my.max(s.bottom())));
    let abs_x = evdev::UinputAbsSetup::new(
        evdev::AbsoluteAxisCode::ABS_X,
        evdev::AbsInfo::new(0, 0, max_x, 0, 0, 1),
    );
    let abs_y = evdev::UinputAbsSetup::new(
        evdev::AbsoluteAxisCode::ABS_Y,
        evdev::AbsInfo::new(0, 0, max_y, 0, 0, 1),
    );

    VirtualDevice::builder()
        .map_err(|e| InputError::VirtualDeviceCreate(e.to_string()))?
        .name("edgelink virtual input")
        .with_keys(&keys)
        .map_err(|e| InputError::VirtualDeviceCreate(e.to_string()))?
        .with_relative_axes(&rel)
        .map_err(|e| InputError::VirtualDeviceCreate(e.to_string()))?
        .with_absolute_axis(&abs_x)
        .map_err(|e| InputError::VirtualDeviceCreate(e.to_string()))?
        .with_absolute_axis(&abs_y)
        .map_err(|e| InputError::VirtualDeviceCreate(e.to_string()))?
        .build()
        .map_err(|e| InputError::VirtualDeviceCreate(e.to_string()))
}

/// Convert a captured evdev event to our `InputEvent`, tracking the
/// running cursor position for relative-motion devices.
fn convert_evdev_event(ev: &evdev::InputEvent, cursor: &Arc<Mutex<(i32, i32)>>) -> Option<InputEvent> {
    match ev.destructure() {
        EventSummary::Key(_, key, value) => {
            let state = keymap::evdev_value_to_button_state(value)?;
            if let Some(button) = keymap::evdev_key_to_mouse_button(key) {
                let (x, y) = *cursor.lock().unwrap();
                Some(InputEvent::MouseButton { button, state, x, y })
            } else {
                let code = keymap::evdev_key_to_keycode(key);
                Some(InputEvent::Key { code, state })
            }
        }
        EventSummary::RelativeAxis(_, axis, value) => match axis {
            RelativeAxisCode::REL_X => {
                let mut pos = cursor.lock().unwrap();
                pos.0 += value;
                Some(InputEvent::MouseMove { x: pos.0, y: pos.1, absolute: false })
            }
            RelativeAxisCode::REL_Y => {
                let mut pos = cursor.lock().unwrap();
                pos.1 += value;
                Some(InputEvent::MouseMove { x: pos.0, y: pos.1, absolute: false })
            }
            RelativeAxisCode::REL_WHEEL => Some(InputEvent::Scroll { delta_x: 0, delta_y: value * 120 }),
            RelativeAxisCode::REL_HWHEEL => Some(InputEvent::Scroll { delta_x: value * 120, delta_y: 0 }),
            _ => None,
        },
        _ => None,
    }
}
