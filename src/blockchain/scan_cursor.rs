use crate::models::{Address, Amount, MonitorEvent};

/// Mutable monitoring state, owned by a single poll loop.
///
/// `last_scanned_height` only moves forward. `last_known_balance` always
/// belongs to the current `monitored_address`; switching addresses clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCursor {
    last_scanned_height: u64,
    monitored_address: Option<Address>,
    last_known_balance: Option<Amount>,
}

impl ScanCursor {
    /// A cursor that treats everything up to `start_height` as already seen
    pub fn new(start_height: u64) -> Self {
        Self {
            last_scanned_height: start_height,
            monitored_address: None,
            last_known_balance: None,
        }
    }

    pub fn last_scanned_height(&self) -> u64 {
        self.last_scanned_height
    }

    pub fn monitored_address(&self) -> Option<Address> {
        self.monitored_address
    }

    pub fn last_known_balance(&self) -> Option<Amount> {
        self.last_known_balance
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitored_address.is_some()
    }

    /// First height not yet scanned
    pub fn next_height(&self) -> u64 {
        self.last_scanned_height.saturating_add(1)
    }

    /// Point the cursor at a (possibly absent) address.
    ///
    /// Returns true when the address changed, in which case the balance
    /// baseline is dropped. The scan height is kept as is.
    pub fn retarget(&mut self, address: Option<Address>) -> bool {
        if self.monitored_address == address {
            return false;
        }
        self.monitored_address = address;
        self.last_known_balance = None;
        true
    }

    /// Record a balance reading, returning a change event when it differs
    /// from the previous reading or is the first one.
    pub fn observe_balance(&mut self, balance: Amount) -> Option<MonitorEvent> {
        let address = self.monitored_address?;

        if self.last_known_balance == Some(balance) {
            return None;
        }

        let previous = self.last_known_balance.replace(balance);
        Some(MonitorEvent::BalanceChanged {
            address,
            previous,
            current: balance,
        })
    }

    /// Mark everything up to `height` as scanned. Never moves backwards.
    pub fn advance_to(&mut self, height: u64) {
        if height > self.last_scanned_height {
            self.last_scanned_height = height;
        }
    }
}
