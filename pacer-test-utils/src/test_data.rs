// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::person::Person;

/// Arguments of a call made "on" a receiver: who is greeted, and with what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    pub receiver: Person,
    pub message: String,
}

impl Greeting {
    pub fn new(receiver: Person, message: impl Into<String>) -> Self {
        Self {
            receiver,
            message: message.into(),
        }
    }

    /// What a target might do with it.
    pub fn render(&self) -> String {
        format!("{}, {}", self.message, self.receiver.name)
    }
}

pub fn person_alice() -> Person {
    Person::new("Alice".to_string(), 25)
}

pub fn person_bob() -> Person {
    Person::new("Bob".to_string(), 30)
}

pub fn person_charlie() -> Person {
    Person::new("Charlie".to_string(), 35)
}

pub fn greet(receiver: Person, message: &str) -> Greeting {
    Greeting::new(receiver, message)
}
