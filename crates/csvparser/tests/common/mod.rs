#![allow(dead_code)]

use csvparser::BoxError;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub school: String,
}

impl Person {
    pub fn new(name: &str, age: u32, school: &str) -> Self {
        Self {
            name: name.into(),
            age,
            school: school.into(),
        }
    }
}

pub fn name_parser(value: &str, into: &mut Person) -> Result<(), BoxError> {
    into.name = value.trim_matches(' ').to_string();
    Ok(())
}

pub fn age_parser(value: &str, into: &mut Person) -> Result<(), BoxError> {
    let age: u32 = value.trim_matches(' ').parse()?;
    if age > 150 {
        return Err("impossible age".into());
    }
    into.age = age;
    into.school = if age > 65 {
        "old school"
    } else if age > 20 && age < 65 {
        "middle school"
    } else {
        "new school"
    }
    .to_string();
    Ok(())
}
