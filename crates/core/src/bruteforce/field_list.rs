//! `UStruct::Children`, `FField::Name` and `FField::Next` discovery
//!
//! The vector landmark has exactly three fields named `X`, `Y` and `Z`, so
//! its field list is recognisable from names alone: find a pointer to a
//! polymorphic object carrying an axis name, then a sibling pointer inside it
//! that leads to a different axis name at the same inner offset.

use uelayout_engine::read_name_at;
use uelayout_sdk::landmarks::is_axis_name;

use super::{pointer_steps, LayoutBruteforcer};

/// Offsets recovered from the vector landmark's field list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldListLayout {
    /// Offset of the field list head inside a struct
    pub children: usize,
    /// Offset of the name inside a field
    pub name: usize,
    /// Offset of the sibling pointer inside a field, if it was found
    pub next: Option<usize>,
}

impl LayoutBruteforcer<'_> {
    /// Find the field list layout starting the outer scan at `start`
    ///
    /// A candidate whose sibling pointer is also found wins. Otherwise the
    /// first `(children, name)` match is returned without a sibling offset.
    #[tracing::instrument(skip_all, fields(start = format_args!("{:#x}", start)))]
    pub fn find_field_list(&self, vector: usize, start: usize) -> Option<FieldListLayout> {
        let mut first_match = None;

        for children in pointer_steps(start, self.scan.ceiling) {
            let Some(head) = self.read_polymorphic_at(vector, children) else {
                continue;
            };

            for name in 8..self.scan.field_window {
                let Some(head_name) = read_name_at(self.memory, self.names, head, name) else {
                    continue;
                };
                if !is_axis_name(&head_name) {
                    continue;
                }

                tracing::debug!(
                    "[UStruct] Candidate field list at {:#x}, name {:?} at {:#x}",
                    children,
                    head_name,
                    name
                );

                if let Some(next) = self.find_next(head, name, &head_name) {
                    tracing::info!("[UStruct] Found Children at offset {:#x}", children);
                    tracing::info!("[UField] Found Name at offset {:#x}", name);
                    tracing::info!("[UField] Found Next at offset {:#x}", next);
                    return Some(FieldListLayout {
                        children,
                        name,
                        next: Some(next),
                    });
                }

                first_match.get_or_insert(FieldListLayout {
                    children,
                    name,
                    next: None,
                });
            }
        }

        let layout = first_match?;
        tracing::info!("[UStruct] Found Children at offset {:#x}", layout.children);
        tracing::info!("[UField] Found Name at offset {:#x}", layout.name);
        tracing::warn!("[UField] Next not found, keeping fallback");
        Some(layout)
    }

    /// Find the sibling pointer offset inside `head`
    fn find_next(&self, head: usize, name: usize, head_name: &str) -> Option<usize> {
        for next in pointer_steps(0, self.scan.field_window) {
            let Some(sibling) = self.read_polymorphic_at(head, next) else {
                continue;
            };
            let Some(sibling_name) = read_name_at(self.memory, self.names, sibling, name) else {
                continue;
            };
            if sibling_name == head_name || !is_axis_name(&sibling_name) {
                continue;
            }

            // One more hop for diagnostics only
            match self
                .read_polymorphic_at(sibling, next)
                .and_then(|third| read_name_at(self.memory, self.names, third, name))
            {
                Some(third_name) => tracing::debug!(
                    "[UField] Field chain: {} -> {} -> {}",
                    head_name,
                    sibling_name,
                    third_name
                ),
                None => tracing::debug!("[UField] Field chain: {} -> {}", head_name, sibling_name),
            }

            return Some(next);
        }
        None
    }
}
