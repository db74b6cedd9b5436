//! Gui - the explicit UI context
//!
//! Holds the window arena, the global hub, config, the dialog stack and the
//! screen buffer. Passed as `&mut Gui` to every operation and callback; there
//! is no ambient global state.

use slotmap::SlotMap;
use tracing::debug;

use crate::config::ConfigSet;
use crate::engine::window::Window;
use crate::notify::Hub;
use crate::notify::hub::ObserverRegistry;
use crate::renderer::FrameBuffer;
use crate::state::dialog::DialogStack;
use crate::state::keymap::Keymap;
use crate::types::WindowId;

pub struct Gui {
    pub(crate) windows: SlotMap<WindowId, Window>,
    pub(crate) global: Hub,
    pub(crate) observers: ObserverRegistry,
    pub(crate) next_observer: u64,
    pub(crate) config: ConfigSet,
    pub(crate) dialogs: DialogStack,
    pub(crate) root: Option<WindowId>,
    pub(crate) all_dialogs: Option<WindowId>,
    pub(crate) message: Option<WindowId>,
    pub(crate) screen: FrameBuffer,
    pub(crate) keymap: Keymap,
    shut_down: bool,
}

impl Gui {
    /// Context with default config and an empty screen.
    pub fn new() -> Self {
        Self::with_config(ConfigSet::default())
    }

    pub fn with_config(config: ConfigSet) -> Self {
        Self {
            windows: SlotMap::with_key(),
            global: Hub::default(),
            observers: ObserverRegistry::default(),
            next_observer: 0,
            config,
            dialogs: DialogStack::default(),
            root: None,
            all_dialogs: None,
            message: None,
            screen: FrameBuffer::new(0, 0),
            keymap: Keymap::default(),
            shut_down: false,
        }
    }

    pub fn config(&self) -> &ConfigSet {
        &self.config
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    pub fn screen(&self) -> &FrameBuffer {
        &self.screen
    }

    pub(crate) fn screen_mut(&mut self) -> &mut FrameBuffer {
        &mut self.screen
    }

    pub fn root(&self) -> Option<WindowId> {
        self.root
    }

    pub fn all_dialogs(&self) -> Option<WindowId> {
        self.all_dialogs
    }

    /// Free every remaining window. Runs once; later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        let leftover: Vec<WindowId> = self.dialogs.iter().collect();
        if let Some(root) = self.root {
            self.window_free(root);
        }
        for dlg in leftover {
            self.window_free(dlg);
        }
        let detached: Vec<WindowId> = self.windows.keys().collect();
        for win in detached {
            self.window_free(win);
        }
        debug!("gui shut down");
    }
}

impl Default for Gui {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Gui {
    fn drop(&mut self) {
        self.shutdown();
    }
}
