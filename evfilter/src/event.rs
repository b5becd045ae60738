//! Events delivered to the filter indexes.

use crate::common::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// An event flowing through the engine: a type name plus named properties.
///
/// Field extractors read properties by name; a missing property reads as
/// [`Value::Null`].
///
/// # Examples
///
/// ```rust
/// use evfilter::event::EventBean;
/// use evfilter::common::Value;
///
/// let event = EventBean::new("Position")
///     .with("px", 12.0)
///     .with("py", 40.5);
/// assert_eq!(event.get("px"), Some(&Value::F64(12.0)));
/// assert_eq!(event.get("pz"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBean {
    event_type: String,
    properties: BTreeMap<String, Value>,
}

impl EventBean {
    /// Creates an event of the given type without properties.
    pub fn new(event_type: &str) -> Self {
        EventBean {
            event_type: event_type.to_string(),
            properties: BTreeMap::new(),
        }
    }

    /// Adds a property and returns the event, for building events inline.
    pub fn with<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
        self.put(name, value);
        self
    }

    /// Sets a property, returning the previous value if there was one.
    pub fn put<V: Into<Value>>(&mut self, name: &str, value: V) -> Option<Value> {
        self.properties.insert(name.to_string(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn properties(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.properties.iter()
    }
}

impl Display for EventBean {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{", self.event_type)?;
        for (i, (name, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", name, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut event = EventBean::new("Tick");
        assert_eq!(event.put("price", 10i32), None);
        assert_eq!(event.put("price", 11i32), Some(Value::I32(10)));
        assert_eq!(event.get("price"), Some(&Value::I32(11)));
        assert_eq!(event.event_type(), "Tick");
    }

    #[test]
    fn test_display_is_ordered() {
        let event = EventBean::new("Pos").with("y", 2i32).with("x", "a");
        assert_eq!(event.to_string(), "Pos{x=\"a\", y=2}");
    }

    #[test]
    fn test_properties_iter() {
        let event = EventBean::new("Pos").with("a", 1i32).with("b", 2i32);
        let names: Vec<_> = event.properties().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
