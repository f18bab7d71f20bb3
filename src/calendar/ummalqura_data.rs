//! Umm al-Qura lunation starts.
//!
//! Each entry is the MCJDN of the first day of one lunation, starting at
//! 1 Muharram 1356 AH and ending with 1 Muharram 1501 AH, twelve entries per
//! year. The final entry only closes the last month of 1500 AH.

/// First year covered by [`LUNATION_STARTS`].
pub(super) const FIRST_YEAR: i32 = 1356;

/// Last year covered by [`LUNATION_STARTS`].
pub(super) const LAST_YEAR: i32 = 1500;

#[rustfmt::skip]
pub(super) static LUNATION_STARTS: [i32; 1741] = [
    28607, 28636, 28665, 28695, 28724, 28753, 28783, 28812, 28842, 28872, 28902, 28931,  // 1356
    28961, 28991, 29020, 29049, 29079, 29108, 29137, 29167, 29196, 29226, 29256, 29285,  // 1357
    29315, 29345, 29375, 29404, 29433, 29463, 29492, 29521, 29551, 29580, 29610, 29639,  // 1358
    29669, 29699, 29729, 29758, 29788, 29817, 29847, 29876, 29905, 29935, 29964, 29994,  // 1359
    30023, 30053, 30083, 30112, 30142, 30172, 30201, 30231, 30260, 30289, 30319, 30348,  // 1360
    30378, 30407, 30437, 30466, 30496, 30526, 30555, 30585, 30615, 30644, 30674, 30703,  // 1361
    30732, 30762, 30791, 30821, 30850, 30880, 30909, 30939, 30969, 30998, 31028, 31058,  // 1362
    31087, 31117, 31146, 31175, 31205, 31234, 31264, 31293, 31323, 31352, 31382, 31412,  // 1363
    31441, 31471, 31501, 31530, 31559, 31589, 31618, 31647, 31677, 31706, 31736, 31766,  // 1364
    31796, 31825, 31855, 31885, 31914, 31943, 31973, 32002, 32031, 32061, 32090, 32120,  // 1365
    32150, 32179, 32209, 32239, 32269, 32298, 32327, 32357, 32386, 32415, 32445, 32474,  // 1366
    32504, 32533, 32563, 32593, 32623, 32652, 32682, 32711, 32741, 32770, 32799, 32829,  // 1367
    32858, 32888, 32917, 32947, 32977, 33006, 33036, 33066, 33095, 33125, 33154, 33183,  // 1368
    33213, 33242, 33272, 33301, 33331, 33360, 33390, 33420, 33449, 33479, 33509, 33538,  // 1369
    33567, 33597, 33626, 33656, 33685, 33715, 33744, 33774, 33804, 33833, 33863, 33892,  // 1370
    33922, 33951, 33981, 34010, 34040, 34069, 34099, 34128, 34158, 34187, 34217, 34246,  // 1371
    34276, 34306, 34335, 34365, 34394, 34424, 34453, 34483, 34512, 34541, 34571, 34601,  // 1372
    34630, 34660, 34690, 34719, 34749, 34779, 34808, 34837, 34867, 34896, 34925, 34955,  // 1373
    34984, 35014, 35044, 35073, 35103, 35133, 35163, 35192, 35221, 35251, 35280, 35309,  // 1374
    35339, 35368, 35398, 35427, 35457, 35487, 35517, 35546, 35576, 35605, 35635, 35664,  // 1375
    35693, 35723, 35752, 35782, 35811, 35841, 35871, 35901, 35930, 35960, 35989, 36019,  // 1376
    36048, 36077, 36107, 36136, 36166, 36195, 36225, 36255, 36284, 36314, 36344, 36373,  // 1377
    36403, 36432, 36461, 36491, 36520, 36550, 36579, 36609, 36638, 36668, 36698, 36727,  // 1378
    36757, 36786, 36816, 36845, 36875, 36904, 36934, 36963, 36993, 37022, 37052, 37081,  // 1379
    37111, 37141, 37170, 37200, 37229, 37259, 37288, 37318, 37347, 37377, 37406, 37436,  // 1380
    37465, 37495, 37524, 37554, 37584, 37613, 37643, 37672, 37702, 37731, 37761, 37790,  // 1381
    37819, 37849, 37878, 37908, 37938, 37967, 37997, 38027, 38056, 38086, 38115, 38145,  // 1382
    38174, 38203, 38233, 38262, 38292, 38321, 38351, 38381, 38411, 38440, 38470, 38499,  // 1383
    38529, 38558, 38587, 38617, 38646, 38676, 38705, 38735, 38765, 38795, 38824, 38854,  // 1384
    38883, 38913, 38942, 38971, 39001, 39030, 39059, 39089, 39119, 39149, 39178, 39208,  // 1385
    39238, 39267, 39297, 39326, 39355, 39385, 39414, 39443, 39473, 39503, 39532, 39562,  // 1386
    39592, 39621, 39651, 39681, 39710, 39739, 39769, 39798, 39828, 39857, 39887, 39916,  // 1387
    39946, 39975, 40005, 40035, 40064, 40094, 40123, 40153, 40182, 40212, 40241, 40271,  // 1388
    40300, 40330, 40359, 40389, 40418, 40448, 40478, 40507, 40537, 40566, 40596, 40625,  // 1389
    40655, 40684, 40713, 40743, 40772, 40802, 40832, 40861, 40891, 40921, 40950, 40980,  // 1390
    41009, 41039, 41068, 41097, 41127, 41156, 41186, 41215, 41245, 41275, 41305, 41334,  // 1391
    41364, 41393, 41423, 41452, 41481, 41511, 41540, 41570, 41599, 41629, 41659, 41689,  // 1392
    41718, 41748, 41777, 41807, 41836, 41865, 41895, 41924, 41953, 41983, 42013, 42043,  // 1393
    42072, 42102, 42132, 42161, 42191, 42220, 42249, 42279, 42308, 42337, 42367, 42397,  // 1394
    42426, 42456, 42486, 42516, 42545, 42575, 42604, 42633, 42663, 42692, 42721, 42751,  // 1395
    42780, 42810, 42840, 42870, 42899, 42929, 42958, 42988, 43017, 43047, 43076, 43106,  // 1396
    43135, 43164, 43194, 43224, 43253, 43283, 43313, 43342, 43372, 43401, 43431, 43460,  // 1397
    43490, 43519, 43548, 43578, 43607, 43637, 43667, 43696, 43726, 43756, 43785, 43815,  // 1398
    43844, 43874, 43903, 43933, 43962, 43991, 44021, 44050, 44080, 44110, 44139, 44169,  // 1399
    44199, 44228, 44258, 44287, 44317, 44346, 44375, 44405, 44434, 44464, 44493, 44523,  // 1400
    44553, 44582, 44612, 44642, 44671, 44701, 44730, 44759, 44789, 44818, 44847, 44877,  // 1401
    44907, 44936, 44966, 44996, 45026, 45055, 45085, 45114, 45143, 45173, 45202, 45231,  // 1402
    45261, 45291, 45320, 45350, 45380, 45410, 45439, 45469, 45498, 45527, 45557, 45586,  // 1403
    45615, 45645, 45674, 45704, 45734, 45764, 45793, 45823, 45853, 45882, 45911, 45941,  // 1404
    45970, 45999, 46029, 46058, 46088, 46118, 46147, 46177, 46207, 46236, 46266, 46295,  // 1405
    46325, 46354, 46383, 46413, 46442, 46472, 46501, 46531, 46561, 46590, 46620, 46650,  // 1406
    46679, 46709, 46738, 46768, 46797, 46826, 46856, 46885, 46915, 46944, 46974, 47004,  // 1407
    47033, 47063, 47093, 47122, 47152, 47181, 47211, 47240, 47269, 47299, 47328, 47358,  // 1408
    47387, 47417, 47447, 47476, 47506, 47536, 47565, 47595, 47624, 47653, 47683, 47712,  // 1409
    47742, 47771, 47801, 47831, 47860, 47890, 47920, 47949, 47979, 48008, 48037, 48067,  // 1410
    48096, 48125, 48155, 48185, 48214, 48244, 48274, 48304, 48333, 48363, 48392, 48421,  // 1411
    48451, 48480, 48509, 48539, 48568, 48598, 48628, 48658, 48687, 48717, 48747, 48776,  // 1412
    48805, 48835, 48864, 48893, 48923, 48952, 48982, 49012, 49041, 49071, 49101, 49130,  // 1413
    49160, 49189, 49219, 49248, 49277, 49307, 49336, 49366, 49395, 49425, 49455, 49485,  // 1414
    49514, 49544, 49573, 49603, 49632, 49661, 49691, 49720, 49750, 49779, 49809, 49839,  // 1415
    49868, 49898, 49927, 49957, 49987, 50016, 50046, 50075, 50104, 50134, 50163, 50193,  // 1416
    50222, 50252, 50282, 50311, 50341, 50370, 50400, 50430, 50459, 50488, 50518, 50547,  // 1417
    50577, 50606, 50636, 50665, 50695, 50725, 50754, 50784, 50814, 50843, 50873, 50902,  // 1418
    50931, 50961, 50990, 51019, 51049, 51079, 51108, 51138, 51168, 51198, 51227, 51257,  // 1419
    51286, 51315, 51345, 51374, 51403, 51433, 51462, 51492, 51522, 51552, 51581, 51611,  // 1420
    51641, 51670, 51699, 51729, 51758, 51787, 51817, 51846, 51876, 51906, 51935, 51965,  // 1421
    51995, 52024, 52054, 52083, 52113, 52142, 52171, 52201, 52230, 52260, 52289, 52319,  // 1422
    52349, 52379, 52408, 52438, 52467, 52497, 52526, 52555, 52585, 52614, 52644, 52673,  // 1423
    52703, 52733, 52762, 52792, 52822, 52851, 52881, 52910, 52939, 52969, 52998, 53028,  // 1424
    53057, 53087, 53116, 53146, 53176, 53205, 53235, 53264, 53294, 53323, 53353, 53382,  // 1425
    53412, 53441, 53471, 53500, 53530, 53559, 53589, 53619, 53648, 53678, 53708, 53737,  // 1426
    53766, 53796, 53825, 53855, 53884, 53913, 53943, 53973, 54002, 54032, 54062, 54091,  // 1427
    54121, 54151, 54180, 54209, 54239, 54268, 54297, 54327, 54356, 54386, 54416, 54446,  // 1428
    54475, 54505, 54535, 54564, 54593, 54623, 54652, 54681, 54711, 54740, 54770, 54800,  // 1429
    54829, 54859, 54889, 54919, 54948, 54977, 55007, 55036, 55065, 55095, 55124, 55154,  // 1430
    55183, 55213, 55243, 55273, 55302, 55332, 55361, 55391, 55420, 55449, 55479, 55508,  // 1431
    55538, 55567, 55597, 55627, 55656, 55686, 55716, 55745, 55775, 55804, 55833, 55863,  // 1432
    55892, 55922, 55951, 55981, 56010, 56040, 56070, 56099, 56129, 56159, 56188, 56217,  // 1433
    56247, 56276, 56306, 56335, 56365, 56394, 56424, 56453, 56483, 56513, 56542, 56572,  // 1434
    56601, 56631, 56660, 56690, 56719, 56749, 56778, 56808, 56837, 56867, 56896, 56926,  // 1435
    56956, 56985, 57015, 57044, 57074, 57103, 57133, 57162, 57191, 57221, 57250, 57280,  // 1436
    57310, 57340, 57369, 57399, 57428, 57458, 57487, 57517, 57546, 57575, 57605, 57634,  // 1437
    57664, 57694, 57723, 57753, 57783, 57812, 57842, 57871, 57901, 57930, 57959, 57989,  // 1438
    58018, 58048, 58077, 58107, 58137, 58167, 58196, 58226, 58255, 58285, 58314, 58343,  // 1439
    58373, 58402, 58432, 58461, 58491, 58521, 58551, 58580, 58610, 58639, 58669, 58698,  // 1440
    58727, 58757, 58786, 58816, 58845, 58875, 58905, 58934, 58964, 58994, 59023, 59053,  // 1441
    59082, 59111, 59141, 59170, 59200, 59229, 59259, 59288, 59318, 59348, 59377, 59407,  // 1442
    59436, 59466, 59495, 59525, 59554, 59584, 59613, 59643, 59672, 59702, 59731, 59761,  // 1443
    59791, 59820, 59850, 59879, 59909, 59938, 59968, 59997, 60027, 60056, 60085, 60115,  // 1444
    60145, 60174, 60204, 60234, 60263, 60293, 60322, 60352, 60381, 60411, 60440, 60469,  // 1445
    60499, 60528, 60558, 60588, 60617, 60647, 60677, 60706, 60736, 60765, 60795, 60824,  // 1446
    60853, 60883, 60912, 60942, 60971, 61001, 61031, 61061, 61090, 61120, 61149, 61179,  // 1447
    61208, 61237, 61267, 61296, 61326, 61355, 61385, 61415, 61445, 61474, 61504, 61533,  // 1448
    61563, 61592, 61621, 61651, 61680, 61709, 61739, 61769, 61799, 61828, 61858, 61888,  // 1449
    61917, 61947, 61976, 62005, 62035, 62064, 62093, 62123, 62153, 62182, 62212, 62242,  // 1450
    62271, 62301, 62330, 62360, 62389, 62419, 62448, 62478, 62507, 62537, 62566, 62596,  // 1451
    62625, 62655, 62685, 62714, 62744, 62773, 62803, 62832, 62862, 62891, 62921, 62950,  // 1452
    62980, 63009, 63039, 63068, 63098, 63128, 63157, 63187, 63216, 63246, 63275, 63305,  // 1453
    63334, 63363, 63393, 63422, 63452, 63482, 63511, 63541, 63571, 63600, 63630, 63659,  // 1454
    63689, 63718, 63747, 63777, 63806, 63836, 63865, 63895, 63925, 63955, 63984, 64014,  // 1455
    64043, 64073, 64102, 64131, 64161, 64190, 64220, 64249, 64279, 64309, 64339, 64368,  // 1456
    64398, 64427, 64457, 64486, 64515, 64545, 64574, 64603, 64633, 64663, 64692, 64722,  // 1457
    64752, 64782, 64811, 64841, 64870, 64899, 64929, 64958, 64987, 65017, 65047, 65076,  // 1458
    65106, 65136, 65166, 65195, 65225, 65254, 65283, 65313, 65342, 65371, 65401, 65430,  // 1459
    65460, 65490, 65520, 65549, 65579, 65608, 65638, 65667, 65697, 65726, 65755, 65785,  // 1460
    65814, 65844, 65874, 65903, 65933, 65963, 65992, 66022, 66051, 66081, 66110, 66140,  // 1461
    66169, 66198, 66228, 66257, 66287, 66317, 66346, 66376, 66405, 66435, 66465, 66494,  // 1462
    66524, 66553, 66583, 66612, 66641, 66671, 66700, 66730, 66760, 66789, 66819, 66849,  // 1463
    66878, 66908, 66937, 66967, 66996, 67025, 67055, 67084, 67114, 67143, 67173, 67203,  // 1464
    67232, 67262, 67292, 67321, 67351, 67380, 67409, 67439, 67468, 67497, 67527, 67557,  // 1465
    67586, 67616, 67646, 67676, 67705, 67735, 67764, 67793, 67823, 67852, 67881, 67911,  // 1466
    67941, 67970, 68000, 68030, 68060, 68089, 68119, 68148, 68177, 68207, 68236, 68265,  // 1467
    68295, 68324, 68354, 68384, 68414, 68443, 68473, 68502, 68532, 68561, 68591, 68620,  // 1468
    68649, 68679, 68708, 68738, 68768, 68797, 68827, 68857, 68886, 68916, 68945, 68975,  // 1469
    69004, 69033, 69063, 69092, 69122, 69151, 69181, 69211, 69240, 69270, 69300, 69329,  // 1470
    69359, 69388, 69418, 69447, 69476, 69506, 69535, 69565, 69594, 69624, 69654, 69683,  // 1471
    69713, 69743, 69772, 69802, 69831, 69860, 69890, 69919, 69949, 69978, 70008, 70037,  // 1472
    70067, 70097, 70126, 70156, 70186, 70215, 70245, 70274, 70303, 70333, 70362, 70391,  // 1473
    70421, 70451, 70481, 70510, 70540, 70570, 70599, 70629, 70658, 70687, 70717, 70746,  // 1474
    70775, 70805, 70835, 70864, 70894, 70924, 70954, 70983, 71013, 71042, 71071, 71101,  // 1475
    71130, 71159, 71189, 71218, 71248, 71278, 71308, 71337, 71367, 71397, 71426, 71455,  // 1476
    71485, 71514, 71543, 71573, 71602, 71632, 71662, 71691, 71721, 71751, 71780, 71810,  // 1477
    71839, 71869, 71898, 71927, 71957, 71986, 72016, 72045, 72075, 72105, 72135, 72164,  // 1478
    72194, 72223, 72253, 72282, 72311, 72341, 72370, 72400, 72429, 72459, 72489, 72518,  // 1479
    72548, 72577, 72607, 72637, 72666, 72695, 72725, 72754, 72784, 72813, 72843, 72872,  // 1480
    72902, 72931, 72961, 72991, 73020, 73050, 73080, 73109, 73138, 73168, 73197, 73227,  // 1481
    73256, 73286, 73315, 73345, 73375, 73404, 73434, 73464, 73493, 73523, 73552, 73581,  // 1482
    73611, 73640, 73669, 73699, 73729, 73758, 73788, 73818, 73848, 73877, 73907, 73936,  // 1483
    73965, 73995, 74024, 74053, 74083, 74112, 74142, 74172, 74202, 74231, 74261, 74291,  // 1484
    74320, 74349, 74379, 74408, 74437, 74467, 74496, 74526, 74556, 74585, 74615, 74645,  // 1485
    74674, 74704, 74733, 74763, 74792, 74821, 74851, 74880, 74910, 74939, 74969, 74999,  // 1486
    75029, 75058, 75088, 75117, 75147, 75176, 75205, 75235, 75264, 75294, 75323, 75353,  // 1487
    75383, 75412, 75442, 75472, 75501, 75531, 75560, 75589, 75619, 75648, 75678, 75707,  // 1488
    75737, 75766, 75796, 75826, 75855, 75885, 75914, 75944, 75973, 76003, 76032, 76062,  // 1489
    76091, 76121, 76150, 76180, 76209, 76239, 76269, 76298, 76328, 76357, 76387, 76416,  // 1490
    76446, 76475, 76505, 76534, 76563, 76593, 76623, 76652, 76682, 76712, 76741, 76771,  // 1491
    76800, 76830, 76859, 76889, 76918, 76947, 76977, 77006, 77036, 77066, 77096, 77125,  // 1492
    77155, 77185, 77214, 77243, 77273, 77302, 77331, 77361, 77390, 77420, 77450, 77479,  // 1493
    77509, 77539, 77568, 77598, 77627, 77657, 77686, 77715, 77745, 77774, 77804, 77833,  // 1494
    77863, 77893, 77923, 77952, 77982, 78011, 78041, 78070, 78099, 78129, 78158, 78188,  // 1495
    78217, 78247, 78277, 78306, 78336, 78366, 78395, 78425, 78454, 78483, 78513, 78542,  // 1496
    78572, 78601, 78631, 78660, 78690, 78720, 78749, 78779, 78808, 78838, 78867, 78897,  // 1497
    78926, 78956, 78985, 79015, 79044, 79074, 79103, 79133, 79163, 79192, 79222, 79251,  // 1498
    79281, 79310, 79340, 79369, 79399, 79428, 79458, 79487, 79517, 79546, 79576, 79606,  // 1499
    79635, 79665, 79694, 79724, 79753, 79783, 79812, 79841, 79871, 79900, 79930, 79960,  // 1500
    79990,
];
