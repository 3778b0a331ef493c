// ── Cross-system reconciliation ──
//
// Annotates Cirrato printers with their SysMan counterpart. Names are
// compared exactly and the first SysMan printer with an equal name wins.

use crate::model::{Printer, SysManPrinter};

/// Return `printers` with `exists_in_sysman` and `sysman_id` recomputed
/// from `sysman`. Pure and idempotent.
pub fn reconcile<P, S>(printers: &[P], sysman: &[S]) -> Vec<Printer>
where
    P: AsRef<Printer>,
    S: AsRef<SysManPrinter>,
{
    printers
        .iter()
        .map(|p| {
            let mut printer = p.as_ref().clone();
            match sysman.iter().map(|s| s.as_ref()).find(|s| s.name == printer.name) {
                Some(counterpart) => {
                    printer.exists_in_sysman = true;
                    printer.sysman_id = counterpart.id.to_string();
                }
                None => {
                    printer.exists_in_sysman = false;
                    printer.sysman_id = String::new();
                }
            }
            printer
        })
        .collect()
}

impl AsRef<Printer> for Printer {
    fn as_ref(&self) -> &Printer {
        self
    }
}

impl AsRef<SysManPrinter> for SysManPrinter {
    fn as_ref(&self) -> &SysManPrinter {
        self
    }
}
