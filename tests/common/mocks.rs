//! Mock of a user-registered leaf converter.
use csv_mapper::convert::ValueConverter;
use mockall::mock;

use super::Money;

mock! {
    pub MoneyConverter {}
    impl ValueConverter for MoneyConverter {
        type Value = Money;

        fn try_serialize(&self, value: &Money, out: &mut String) -> bool;
        fn try_deserialize(&self, text: &str) -> Option<Money>;
    }
}
