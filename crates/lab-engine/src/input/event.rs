/// Pointer input the viewport understands.
/// Mouse, pen and touch all arrive as pointers; `pointer_id` tells contacts apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A contact began at surface coordinates (x, y).
    PointerDown { x: f32, y: f32, pointer_id: i32, is_primary: bool },
    /// A contact moved to surface coordinates (x, y).
    PointerMove { x: f32, y: f32, pointer_id: i32 },
    /// A contact was lifted.
    PointerUp { pointer_id: i32 },
    /// The platform took the contact away (touch-cancel, lost capture).
    PointerCancel { pointer_id: i32 },
}

impl InputEvent {
    pub fn pointer_id(&self) -> i32 {
        match *self {
            InputEvent::PointerDown { pointer_id, .. }
            | InputEvent::PointerMove { pointer_id, .. }
            | InputEvent::PointerUp { pointer_id }
            | InputEvent::PointerCancel { pointer_id } => pointer_id,
        }
    }
}
