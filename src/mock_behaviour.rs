//! This module provides ways to tweak in-memory sources, so that they can return errors on some tests

use crate::error::DeskError;

/// This stores some behaviour tweaks, that describe how a mocked source will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    // From the EventSource trait
    pub list_events_behaviour: (u32, u32),
    pub get_event_behaviour: (u32, u32),
    pub insert_event_behaviour: (u32, u32),
    pub update_event_behaviour: (u32, u32),
    pub remove_event_behaviour: (u32, u32),

    // From the DirectorySource trait
    pub user_ids_with_role_behaviour: (u32, u32),
    pub profiles_behaviour: (u32, u32),
    pub write_profile_behaviour: (u32, u32),

    // From the TaskSource trait
    pub load_tasks_behaviour: (u32, u32),
    pub save_tasks_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            list_events_behaviour: (0, n_fails),
            get_event_behaviour: (0, n_fails),
            insert_event_behaviour: (0, n_fails),
            update_event_behaviour: (0, n_fails),
            remove_event_behaviour: (0, n_fails),
            user_ids_with_role_behaviour: (0, n_fails),
            profiles_behaviour: (0, n_fails),
            write_profile_behaviour: (0, n_fails),
            load_tasks_behaviour: (0, n_fails),
            save_tasks_behaviour: (0, n_fails),
        }
    }

    /// Only writes will fail, for `n_fails` times
    pub fn fail_writes(n_fails: u32) -> Self {
        Self {
            insert_event_behaviour: (0, n_fails),
            update_event_behaviour: (0, n_fails),
            remove_event_behaviour: (0, n_fails),
            write_profile_behaviour: (0, n_fails),
            save_tasks_behaviour: (0, n_fails),
            ..Self::default()
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_list_events(&mut self) -> Result<(), DeskError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_events_behaviour, "list_events")
    }
    pub fn can_get_event(&mut self) -> Result<(), DeskError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_event_behaviour, "get_event")
    }
    pub fn can_insert_event(&mut self) -> Result<(), DeskError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.insert_event_behaviour, "insert_event")
    }
    pub fn can_update_event(&mut self) -> Result<(), DeskError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.update_event_behaviour, "update_event")
    }
    pub fn can_remove_event(&mut self) -> Result<(), DeskError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.remove_event_behaviour, "remove_event")
    }
    pub fn can_get_user_ids_with_role(&mut self) -> Result<(), DeskError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.user_ids_with_role_behaviour, "user_ids_with_role")
    }
    pub fn can_get_profiles(&mut self) -> Result<(), DeskError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.profiles_behaviour, "profiles")
    }
    pub fn can_write_profile(&mut self) -> Result<(), DeskError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.write_profile_behaviour, "write_profile")
    }
    pub fn can_load_tasks(&mut self) -> Result<(), DeskError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.load_tasks_behaviour, "load_tasks")
    }
    pub fn can_save_tasks(&mut self) -> Result<(), DeskError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.save_tasks_behaviour, "save_tasks")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), DeskError> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else {
        if remaining_failures > 0 {
            value.1 = value.1 - 1;
            log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
            Err(DeskError::remote(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value)))
        } else {
            log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
            Ok(())
        }
    }
}
