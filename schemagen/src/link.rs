//! Field cross-referencing.
//!
//! Links every body field to the first stub sharing its name and hands out
//! wire ids to wire filter fields. The wire id counter is passed in and
//! returned, so a caller processing many components threads one counter
//! through all of them in a fixed order.

use crate::component::{BodyField, Component, StubField, WireId};

/// Index of the first stub whose name equals the body field's name.
pub fn find_matching_stub(field: &BodyField, stubs: &[StubField]) -> Option<usize> {
    stubs.iter().position(|stub| stub.name == field.name)
}

/// Link stubs and assign wire ids for one component.
///
/// Returns the linked component and the next unused wire id. Fields whose
/// type equals `wire_filter_type` receive consecutive ids starting at
/// `next_wire_id`, in declaration order.
pub fn link_fields(
    mut component: Component,
    wire_filter_type: &str,
    mut next_wire_id: WireId,
) -> (Component, WireId) {
    let Component {
        name,
        body_fields,
        stub_fields,
        ..
    } = &mut component;

    for field in body_fields.iter_mut() {
        field.linked_stub = find_matching_stub(field, stub_fields);

        if field.ty == wire_filter_type {
            tracing::trace!(
                component = %name,
                field = %field.name,
                wire_id = %next_wire_id,
                "assigned wire id"
            );
            field.wire_id = Some(next_wire_id);
            next_wire_id = next_wire_id.next();
        }
    }

    (component, next_wire_id)
}
