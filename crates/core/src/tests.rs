use super::ids::{IdError, ItemId, OwnerId};
use super::rank::{Shift, shift_for_move};
use super::validate::{
    EmailError, TitleError, UsernameError, validate_email, validate_title, validate_username,
};

#[test]
fn id_validation() {
    assert_eq!(OwnerId::try_new(0).unwrap_err(), IdError::NonPositive);
    assert_eq!(OwnerId::try_new(-7).unwrap_err(), IdError::NonPositive);
    assert_eq!(OwnerId::try_new(1).unwrap().get(), 1);
    assert_eq!(ItemId::try_new(42).unwrap().get(), 42);
    assert_eq!(ItemId::try_new(0).unwrap_err(), IdError::NonPositive);
}

#[test]
fn title_validation_trims() {
    assert_eq!(validate_title("").unwrap_err(), TitleError::Empty);
    assert_eq!(validate_title("   \t").unwrap_err(), TitleError::Empty);
    assert_eq!(validate_title("  buy milk  ").unwrap(), "buy milk");
}

#[test]
fn username_validation_bounds() {
    assert_eq!(validate_username("ab").unwrap_err(), UsernameError::TooShort);
    assert_eq!(
        validate_username("  ab  ").unwrap_err(),
        UsernameError::TooShort
    );
    assert_eq!(
        validate_username(&"x".repeat(51)).unwrap_err(),
        UsernameError::TooLong
    );
    assert_eq!(validate_username(" alice ").unwrap(), "alice");
    assert!(validate_username(&"x".repeat(50)).is_ok());
}

#[test]
fn email_validation() {
    assert_eq!(validate_email("  ").unwrap_err(), EmailError::Empty);
    assert_eq!(validate_email("alice").unwrap_err(), EmailError::MissingAt);
    assert_eq!(
        validate_email("a@b@c.com").unwrap_err(),
        EmailError::MultipleAt
    );
    assert_eq!(
        validate_email("@example.com").unwrap_err(),
        EmailError::EmptyLocalPart
    );
    assert_eq!(
        validate_email("alice@localhost").unwrap_err(),
        EmailError::InvalidDomain
    );
    assert_eq!(
        validate_email("alice@.com").unwrap_err(),
        EmailError::InvalidDomain
    );
    assert_eq!(
        validate_email(" alice@example.com ").unwrap(),
        "alice@example.com"
    );
}

#[test]
fn shift_for_move_directions() {
    assert_eq!(shift_for_move(3, 3), Shift::None);
    assert_eq!(shift_for_move(2, 5), Shift::Down { above: 2, upto: 5 });
    assert_eq!(shift_for_move(5, 2), Shift::Up { from: 2, below: 5 });
}
