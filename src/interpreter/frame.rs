/// The current mapping of binding variables to their textual values
/// (spec.md §3's "Binding frame"). Variables are always a single lowercase
/// ASCII letter, so a 26-slot array keyed by letter ordinal stands in for a
/// hash map (spec.md §9's design note).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Frame([Option<String>; 26]);

fn slot(c: char) -> Option<usize> {
    if c.is_ascii_lowercase() {
        Some((c as u8 - b'a') as usize)
    } else {
        None
    }
}

impl Frame {
    pub fn get(&self, c: char) -> Option<&str> {
        slot(c).and_then(|i| self.0[i].as_deref())
    }

    pub fn set(&mut self, c: char, value: String) {
        if let Some(i) = slot(c) {
            self.0[i] = Some(value);
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.get(c).is_some()
    }
}
