//! Event Kinds
//!
//! Native event names that message keys can be bound to.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Native event kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    DblClick,
    MouseDown,
    MouseUp,
    MouseMove,
    MouseEnter,
    MouseLeave,
    MouseOver,
    MouseOut,
    PointerDown,
    PointerUp,
    PointerMove,
    KeyDown,
    KeyUp,
    KeyPress,
    Input,
    Change,
    Focus,
    Blur,
    Submit,
    Reset,
    Scroll,
    Wheel,
    TouchStart,
    TouchEnd,
    TouchMove,
    TouchCancel,
    Load,
    /// Any other event name, kept verbatim
    Custom(String),
}

impl EventKind {
    /// Native event name
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Click => "click",
            EventKind::DblClick => "dblclick",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseUp => "mouseup",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseEnter => "mouseenter",
            EventKind::MouseLeave => "mouseleave",
            EventKind::MouseOver => "mouseover",
            EventKind::MouseOut => "mouseout",
            EventKind::PointerDown => "pointerdown",
            EventKind::PointerUp => "pointerup",
            EventKind::PointerMove => "pointermove",
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
            EventKind::KeyPress => "keypress",
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::Submit => "submit",
            EventKind::Reset => "reset",
            EventKind::Scroll => "scroll",
            EventKind::Wheel => "wheel",
            EventKind::TouchStart => "touchstart",
            EventKind::TouchEnd => "touchend",
            EventKind::TouchMove => "touchmove",
            EventKind::TouchCancel => "touchcancel",
            EventKind::Load => "load",
            EventKind::Custom(name) => name,
        }
    }

    /// Check if this event kind bubbles to ancestors
    pub fn bubbles(&self) -> bool {
        !matches!(
            self,
            EventKind::Focus
                | EventKind::Blur
                | EventKind::Load
                | EventKind::Scroll
                | EventKind::MouseEnter
                | EventKind::MouseLeave
        )
    }

    /// Check if this is a high-frequency event
    pub fn is_high_frequency(&self) -> bool {
        matches!(
            self,
            EventKind::MouseMove
                | EventKind::PointerMove
                | EventKind::TouchMove
                | EventKind::Scroll
                | EventKind::Wheel
        )
    }

    /// Reserved attribute carrying the keys bound for this kind: `data-__click__`
    pub fn attribute_name(&self) -> String {
        format!("data-__{}__", self.as_str())
    }
}

impl From<&str> for EventKind {
    fn from(name: &str) -> Self {
        match name {
            "click" => EventKind::Click,
            "dblclick" => EventKind::DblClick,
            "mousedown" => EventKind::MouseDown,
            "mouseup" => EventKind::MouseUp,
            "mousemove" => EventKind::MouseMove,
            "mouseenter" => EventKind::MouseEnter,
            "mouseleave" => EventKind::MouseLeave,
            "mouseover" => EventKind::MouseOver,
            "mouseout" => EventKind::MouseOut,
            "pointerdown" => EventKind::PointerDown,
            "pointerup" => EventKind::PointerUp,
            "pointermove" => EventKind::PointerMove,
            "keydown" => EventKind::KeyDown,
            "keyup" => EventKind::KeyUp,
            "keypress" => EventKind::KeyPress,
            "input" => EventKind::Input,
            "change" => EventKind::Change,
            "focus" => EventKind::Focus,
            "blur" => EventKind::Blur,
            "submit" => EventKind::Submit,
            "reset" => EventKind::Reset,
            "scroll" => EventKind::Scroll,
            "wheel" => EventKind::Wheel,
            "touchstart" => EventKind::TouchStart,
            "touchend" => EventKind::TouchEnd,
            "touchmove" => EventKind::TouchMove,
            "touchcancel" => EventKind::TouchCancel,
            "load" => EventKind::Load,
            other => EventKind::Custom(other.to_string()),
        }
    }
}

impl From<String> for EventKind {
    fn from(name: String) -> Self {
        EventKind::from(name.as_str())
    }
}

impl From<&EventKind> for EventKind {
    fn from(kind: &EventKind) -> Self {
        kind.clone()
    }
}

impl FromStr for EventKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EventKind::from(s))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_bubbles() {
        assert!(EventKind::Click.bubbles());
        assert!(EventKind::Input.bubbles());
        assert!(!EventKind::Focus.bubbles());
        assert!(!EventKind::MouseEnter.bubbles());
    }

    #[test]
    fn test_known_names_round_trip() {
        for name in ["click", "dblclick", "keydown", "input", "touchcancel"] {
            assert_eq!(EventKind::from(name).as_str(), name);
        }
        assert_eq!(EventKind::from("click"), EventKind::Click);
    }

    #[test]
    fn test_custom_kind() {
        let kind = EventKind::from("drop-zone");
        assert_eq!(kind, EventKind::Custom("drop-zone".to_string()));
        assert_eq!(kind.attribute_name(), "data-__drop-zone__");
        assert!(kind.bubbles());
    }

    #[test]
    fn test_reserved_attribute_name() {
        assert_eq!(EventKind::Click.attribute_name(), "data-__click__");
        assert!(EventKind::MouseMove.is_high_frequency());
        assert!(!EventKind::Click.is_high_frequency());
    }
}
