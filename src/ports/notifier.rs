//! Notification port (trait).
//! Receives produced patches; side effects only.

use crate::domain::PatchRecord;

pub trait PatchNotifier {
    fn notify(&self, patches: &[PatchRecord]);
}
