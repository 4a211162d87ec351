macro_rules! nutype_string {
    ($ident:ident($($args:tt)*)) => {
        #[::nutype::nutype(
            derive(Debug, Clone, PartialEq, Eq, Hash, TryFrom, Deref, Serialize, Deserialize),
            $($args)*
        )]
        pub struct $ident(String);
    };
}

pub(crate) use nutype_string;
