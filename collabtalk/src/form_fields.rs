/// Create an enum of labelled form fields that can be cycled through with
/// tab/shift-tab. Focus wraps around at either end.
#[macro_export]
macro_rules! form_fields {
    ($name:ident, $($variant:ident => $label:literal),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            const FIELDS: &'static [$name] = &[
                $($name::$variant),*
            ];

            /// The first field, which gets focus when the form opens
            pub fn first() -> Self {
                Self::FIELDS[0]
            }

            /// What to call this field on screen
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),*
                }
            }

            /// Move focus forward (e.g. with tab)
            pub fn next(self) -> Self {
                Self::FIELDS[(self as usize + 1) % Self::FIELDS.len()]
            }

            /// Move focus backward (e.g. with shift-tab)
            pub fn prev(self) -> Self {
                Self::FIELDS[(self as usize + Self::FIELDS.len() - 1) % Self::FIELDS.len()]
            }
        }
    };
}

#[cfg(test)]
mod test {
    form_fields!(Field, One => "one", Two => "two", Three => "three");

    #[test]
    fn next_wraps_around() {
        assert_eq!(Field::One.next(), Field::Two);
        assert_eq!(Field::Three.next(), Field::One);
    }

    #[test]
    fn prev_wraps_around() {
        assert_eq!(Field::Two.prev(), Field::One);
        assert_eq!(Field::One.prev(), Field::Three);
    }

    #[test]
    fn first_and_label() {
        assert_eq!(Field::first(), Field::One);
        assert_eq!(Field::Three.label(), "three");
    }
}
