#![forbid(unsafe_code)]

pub mod ids {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OwnerId(i64);

    impl OwnerId {
        pub fn get(self) -> i64 {
            self.0
        }

        pub fn try_new(value: i64) -> Result<Self, IdError> {
            if value < 1 {
                return Err(IdError::NonPositive);
            }
            Ok(Self(value))
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemId(i64);

    impl ItemId {
        pub fn get(self) -> i64 {
            self.0
        }

        pub fn try_new(value: i64) -> Result<Self, IdError> {
            if value < 1 {
                return Err(IdError::NonPositive);
            }
            Ok(Self(value))
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum IdError {
        NonPositive,
    }

    impl IdError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::NonPositive => "id must be a positive integer",
            }
        }
    }
}

pub mod rank {
    /// The sibling range a move displaces.
    ///
    /// Ranks are 1-based and dense per owner; moving an item from `current`
    /// to `new` shifts every rank strictly between them (inclusive on the
    /// target side) by one toward the vacated slot.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Shift {
        None,
        /// Ranks in `(current, new]` drop by one.
        Down { above: i64, upto: i64 },
        /// Ranks in `[new, current)` rise by one.
        Up { from: i64, below: i64 },
    }

    pub fn shift_for_move(current: i64, new: i64) -> Shift {
        if new == current {
            Shift::None
        } else if current < new {
            Shift::Down {
                above: current,
                upto: new,
            }
        } else {
            Shift::Up {
                from: new,
                below: current,
            }
        }
    }
}

pub mod validate {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum TitleError {
        Empty,
    }

    impl TitleError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::Empty => "title must not be empty",
            }
        }
    }

    pub fn validate_title(value: &str) -> Result<&str, TitleError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TitleError::Empty);
        }
        Ok(trimmed)
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum UsernameError {
        TooShort,
        TooLong,
    }

    impl UsernameError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::TooShort => "username must be at least 3 characters",
                Self::TooLong => "username must be at most 50 characters",
            }
        }
    }

    pub fn validate_username(value: &str) -> Result<&str, UsernameError> {
        let trimmed = value.trim();
        let chars = trimmed.chars().count();
        if chars < 3 {
            return Err(UsernameError::TooShort);
        }
        if chars > 50 {
            return Err(UsernameError::TooLong);
        }
        Ok(trimmed)
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum EmailError {
        Empty,
        MissingAt,
        MultipleAt,
        EmptyLocalPart,
        InvalidDomain,
    }

    impl EmailError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::Empty => "email must not be empty",
                Self::MissingAt => "email must contain '@'",
                Self::MultipleAt => "email must contain exactly one '@'",
                Self::EmptyLocalPart => "email local part must not be empty",
                Self::InvalidDomain => "email domain must contain a dot",
            }
        }
    }

    pub fn validate_email(value: &str) -> Result<&str, EmailError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if trimmed.matches('@').count() > 1 {
            return Err(EmailError::MultipleAt);
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(EmailError::MissingAt);
        };
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        let dot_ok = domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty());
        if !dot_ok {
            return Err(EmailError::InvalidDomain);
        }
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests;
