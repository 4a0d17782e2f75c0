// Implements the sync `IntoProducer` trait for a producer type by handing out the producer itself.
macro_rules! sync_producible_by_identity {
    (impl<$($g:tt),*> $t:ty) => {
        impl<$($g),*> $crate::sync::IntoProducer for $t
        where
            $t: $crate::sync::Producer,
        {
            type Item = <$t as $crate::sync::Producer>::Item;
            type Final = <$t as $crate::sync::Producer>::Final;
            type Error = <$t as $crate::sync::Producer>::Error;
            type IntoProducer = $t;

            fn into_producer(self) -> Self::IntoProducer {
                self
            }
        }
    };
}

// Implements the local_nb `IntoProducer` trait for a producer type by handing out the producer itself.
macro_rules! local_nb_producible_by_identity {
    (impl<$($g:tt),*> $t:ty) => {
        impl<$($g),*> $crate::local_nb::IntoProducer for $t
        where
            $t: $crate::local_nb::Producer,
        {
            type Item = <$t as $crate::local_nb::Producer>::Item;
            type Final = <$t as $crate::local_nb::Producer>::Final;
            type Error = <$t as $crate::local_nb::Producer>::Error;
            type IntoProducer = $t;

            fn into_producer(self) -> Self::IntoProducer {
                self
            }
        }
    };
}

// Implements the local_nb `IntoProducer` trait for a type that only knows how to become a
// sync producer, by bridging that producer.
macro_rules! local_nb_producible_via_sync {
    (impl<$($g:tt),*> $t:ty) => {
        impl<$($g),*> $crate::local_nb::IntoProducer for $t
        where
            $t: $crate::sync::IntoProducer,
        {
            type Item = <$t as $crate::sync::IntoProducer>::Item;
            type Final = <$t as $crate::sync::IntoProducer>::Final;
            type Error = <$t as $crate::sync::IntoProducer>::Error;
            type IntoProducer = $crate::local_nb::producer::SyncToLocalNb<
                <$t as $crate::sync::IntoProducer>::IntoProducer,
            >;

            fn into_producer(self) -> Self::IntoProducer {
                $crate::local_nb::producer::SyncToLocalNb(
                    $crate::sync::IntoProducer::into_producer(self),
                )
            }
        }
    };
}
